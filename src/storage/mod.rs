use std::sync::Arc;

use serde_json::Value;

use crate::errors::Result;
use crate::models::procedures::{PagedRows, ProcMessage};

pub mod sea_orm_storage;

/// 存储过程调用约定
///
/// 参数一律按位置绑定。列表过程在末尾多一个 `@p_total` OUT 参数，
/// 写操作过程在末尾多一个 `@p_messages_json` OUT 参数。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // CALL procedure(?, ...)，返回所有行
    async fn query(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>>;
    // CALL procedure(?, ..., @p_total)，返回当前页及总数
    async fn query_paged(&self, procedure: &str, args: Vec<Value>) -> Result<PagedRows>;
    // CALL procedure(?, ..., @p_messages_json)，返回解析后的消息
    async fn execute(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<ProcMessage>>;
    // 数据库连通性检查
    async fn ping(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
