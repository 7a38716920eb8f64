use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::ApiResponse;

/// JSON 请求体解析失败时返回统一信封
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Rejected JSON body for {}: {}", req.path(), err);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::failure_empty(format!("Invalid JSON: {err}")));
    InternalError::from_response(err, response).into()
}

/// 查询参数解析失败时返回统一信封
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Rejected query string for {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest().json(ApiResponse::failure_empty(format!(
        "Invalid query parameters: {err}"
    )));
    InternalError::from_response(err, response).into()
}
