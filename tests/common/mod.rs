#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use attendance_server::errors::{AttendanceError, Result};
use attendance_server::models::auth::{AssignType, AuthUser};
use attendance_server::models::procedures::{PagedRows, ProcMessage};
use attendance_server::storage::Storage;
use attendance_server::utils::jwt::JwtUtils;

/// 存储过程的预设返回
#[derive(Clone)]
pub enum Reply {
    Rows(Vec<Value>),
    Paged(PagedRows),
    Messages(Vec<ProcMessage>),
    Fail(String),
}

/// 内存中的存储替身，记录每次调用的过程名与参数
#[derive(Default)]
pub struct MockStorage {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    ping_fails: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            ping_fails: true,
            ..Self::default()
        }
    }

    pub fn reply(self, procedure: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(procedure.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, procedure: &str) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter(|(name, _)| name == procedure)
            .map(|(_, args)| args)
            .collect()
    }

    fn take(&self, procedure: &str, args: Vec<Value>) -> Result<Reply> {
        self.calls
            .lock()
            .unwrap()
            .push((procedure.to_string(), args));
        match self.replies.lock().unwrap().get(procedure).cloned() {
            Some(Reply::Fail(msg)) => Err(AttendanceError::database_operation(msg)),
            Some(reply) => Ok(reply),
            None => Err(AttendanceError::database_operation(format!(
                "PROCEDURE {procedure} does not exist"
            ))),
        }
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn query(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<Value>> {
        match self.take(procedure, args)? {
            Reply::Rows(rows) => Ok(rows),
            _ => Err(AttendanceError::procedure("expected a row set")),
        }
    }

    async fn query_paged(&self, procedure: &str, args: Vec<Value>) -> Result<PagedRows> {
        match self.take(procedure, args)? {
            Reply::Paged(paged) => Ok(paged),
            _ => Err(AttendanceError::procedure("expected a paged result")),
        }
    }

    async fn execute(&self, procedure: &str, args: Vec<Value>) -> Result<Vec<ProcMessage>> {
        match self.take(procedure, args)? {
            Reply::Messages(messages) => Ok(messages),
            _ => Err(AttendanceError::procedure("expected messages")),
        }
    }

    async fn ping(&self) -> Result<()> {
        if self.ping_fails {
            Err(AttendanceError::database_connection("connection refused"))
        } else {
            Ok(())
        }
    }
}

pub fn msg(code: i64, message: &str) -> ProcMessage {
    ProcMessage {
        code,
        message: message.to_string(),
    }
}

pub fn account(user_id: i64, assign_type: AssignType, assign_to: Option<i64>) -> AuthUser {
    AuthUser {
        user_id,
        email: format!("user{user_id}@uni.test"),
        username: format!("user{user_id}"),
        assign_type,
        assign_to,
    }
}

pub fn bearer(user: &AuthUser) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user).expect("token");
    ("Authorization", format!("Bearer {token}"))
}

/// 组装与 main 相同的路由和 app_data

macro_rules! test_app {
    ($storage:expr) => {{
        let storage: std::sync::Arc<dyn attendance_server::storage::Storage> = $storage.clone();
        let cache: std::sync::Arc<dyn attendance_server::cache::ObjectCache> = std::sync::Arc::new(
            attendance_server::cache::object_cache::moka::MokaCacheWrapper::with_settings(1_000, 60),
        );
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(attendance_server::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(attendance_server::utils::query_error_handler),
                )
                .app_data(actix_web::web::Data::new(storage))
                .app_data(actix_web::web::Data::new(cache))
                .app_data(actix_web::web::Data::new(
                    attendance_server::cache::RevocationList::new(std::sync::Arc::new(
                        attendance_server::cache::object_cache::moka::MokaCacheWrapper::with_settings(1_000, 60),
                    )),
                ))
                .app_data(actix_web::web::Data::new(attendance_server::models::AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(attendance_server::routes::configure_health_routes)
                .configure(attendance_server::routes::configure_auth_routes)
                .configure(attendance_server::routes::configure_portal_routes)
                .default_service(actix_web::web::to(attendance_server::routes::route_not_found)),
        )
        .await
    }};
}
