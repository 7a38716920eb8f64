//! 高校考勤平台后端服务
//!
//! 基于 Actix Web 构建，每个接口对应一个 MySQL 存储过程。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），存放吊销的令牌与 formload 数据
//! - `catalog`: 声明式路由表，端点到存储过程的映射
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、角色与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 存储过程调用层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
