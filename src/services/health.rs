use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::sync::Arc;
use ts_rs::TS;

use crate::models::{ApiResponse, AppStartTime};
use crate::storage::Storage;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "health.ts")]
pub struct HealthResponse {
    pub database: bool,
    pub version: String,
    /// 秒
    pub uptime: i64,
}

pub struct HealthService;

impl HealthService {
    pub fn new_lazy() -> Self {
        Self
    }

    /// 数据库可用返回 200，否则 503
    pub async fn check(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let uptime = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|start| {
                chrono::Utc::now()
                    .signed_duration_since(start.start_datetime)
                    .num_seconds()
            })
            .unwrap_or_default();

        let database = match request.app_data::<web::Data<Arc<dyn Storage>>>() {
            Some(storage) => match storage.ping().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Health check database ping failed: {}", e);
                    false
                }
            },
            None => false,
        };

        let response = HealthResponse {
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        };

        if database {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
        } else {
            Ok(HttpResponse::ServiceUnavailable()
                .json(ApiResponse::failure(response, "Database is unavailable")))
        }
    }
}
