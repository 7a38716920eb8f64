//! 对象缓存
//!
//! 两个独立实例：`ObjectCache` 存放 formload 下拉数据，`RevocationList`
//! 存放登出后被吊销的 token ID，下拉数据挤占容量不会让吊销记录被淘汰。
//! 后端通过插件注册表按 `cache.type` 选择，默认使用进程内 Moka。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端不可用，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为秒，0 表示使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

pub fn revoked_token_key(jti: &str) -> String {
    format!("revoked:{jti}")
}

/// 已吊销的 token ID，条目在 token 自然过期时一起过期
#[derive(Clone)]
pub struct RevocationList {
    cache: Arc<dyn ObjectCache>,
}

impl RevocationList {
    pub fn new(cache: Arc<dyn ObjectCache>) -> Self {
        Self { cache }
    }

    /// `ttl` 为 token 剩余秒数，已过期的 token 不记录
    pub async fn revoke(&self, jti: &str, subject: &str, ttl: u64) {
        if ttl > 0 {
            self.cache
                .insert_raw(revoked_token_key(jti), subject.to_string(), ttl)
                .await;
        }
    }

    /// `ExistsButNoValue` 表示后端不可用，调用方决定如何处理
    pub async fn lookup(&self, jti: &str) -> CacheResult<String> {
        self.cache.get_raw(&revoked_token_key(jti)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;

    fn revocations() -> RevocationList {
        RevocationList::new(Arc::new(MokaCacheWrapper::with_settings(100, 60)))
    }

    #[actix_web::test]
    async fn test_revoked_token_is_found() {
        let list = revocations();
        list.revoke("jti-1", "42", 120).await;
        assert_eq!(list.lookup("jti-1").await, CacheResult::Found("42".to_string()));
        assert_eq!(list.lookup("jti-2").await, CacheResult::NotFound);
    }

    #[actix_web::test]
    async fn test_expired_token_is_not_recorded() {
        let list = revocations();
        list.revoke("jti-1", "42", 0).await;
        assert_eq!(list.lookup("jti-1").await, CacheResult::NotFound);
    }
}
