pub mod auth;
pub mod common;
pub mod procedures;

pub use common::{ApiResponse, ListResponse, PaginationQuery};

/// 程序启动时间，供健康检查输出运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
