use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{ProcedureService, handle_error};
use crate::cache::{CacheResult, ObjectCache};
use crate::catalog::{Action, Endpoint, Resource};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::storage::Storage;

/// 单条记录，没有行时返回 "<Subject> not found"（HTTP 200）
pub async fn handle_get(
    service: &ProcedureService,
    request: &HttpRequest,
    resource: &Resource,
    endpoint: &Endpoint,
    args: Vec<Value>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.query(endpoint.procedure, args).await {
        Ok(rows) => match rows.into_iter().next() {
            Some(row) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                row,
                endpoint.action.success_message(resource.subject),
            ))),
            None => Ok(not_found(resource, endpoint)),
        },
        Err(e) => Ok(handle_error(
            endpoint,
            &e,
            &endpoint.action.fallback_message(resource.subject),
        )),
    }
}

/// 结果集。formload 走缓存，且空结果返回 `[]` 而不是 not found
pub async fn handle_rows(
    service: &ProcedureService,
    request: &HttpRequest,
    resource: &Resource,
    endpoint: &Endpoint,
    args: Vec<Value>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let result = if endpoint.action == Action::FormLoad {
        let ttl = AppConfig::get().cache.formload_ttl;
        load_form_data(storage, service.get_cache(request), endpoint, args, ttl).await
    } else {
        storage.query(endpoint.procedure, args).await
    };

    match result {
        Ok(rows) if rows.is_empty() && endpoint.action != Action::FormLoad => {
            Ok(not_found(resource, endpoint))
        }
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            rows,
            endpoint.action.success_message(resource.subject),
        ))),
        Err(e) => Ok(handle_error(
            endpoint,
            &e,
            &endpoint.action.fallback_message(resource.subject),
        )),
    }
}

fn not_found(resource: &Resource, endpoint: &Endpoint) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::failure_empty(
        endpoint.action.not_found_message(resource.subject),
    ))
}

pub(crate) fn formload_cache_key(procedure: &str, args: &[Value]) -> String {
    format!("formload:{}:{}", procedure, Value::from(args.to_vec()))
}

async fn load_form_data(
    storage: Arc<dyn Storage>,
    cache: Option<Arc<dyn ObjectCache>>,
    endpoint: &Endpoint,
    args: Vec<Value>,
    ttl: u64,
) -> Result<Vec<Value>> {
    // ttl 为 0 表示不缓存；后端把 0 当作默认 TTL，不能透传
    let Some(cache) = cache.filter(|_| ttl > 0) else {
        return storage.query(endpoint.procedure, args).await;
    };

    let key = formload_cache_key(endpoint.procedure, &args);
    if let CacheResult::Found(raw) = cache.get_raw(&key).await {
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(rows) => {
                debug!("Form data cache hit: {}", key);
                return Ok(rows);
            }
            Err(e) => warn!("Discarding unreadable cache entry {}: {}", key, e),
        }
    }

    let rows = storage.query(endpoint.procedure, args).await?;
    cache.insert_raw(key, serde_json::to_string(&rows)?, ttl).await;
    Ok(rows)
}
