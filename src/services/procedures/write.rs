use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;
use tracing::info;

use super::{ProcedureService, handle_error};
use crate::catalog::{Endpoint, Resource};
use crate::models::ApiResponse;
use crate::models::procedures::ProcMessage;

/// 写操作：第一条消息 code == 0 为成功，否则 400 并返回通用失败消息，
/// 过程给出的消息原样放在 data 里
pub async fn handle_write(
    service: &ProcedureService,
    request: &HttpRequest,
    resource: &Resource,
    endpoint: &Endpoint,
    args: Vec<Value>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let fallback = endpoint.action.fallback_message(resource.subject);

    let messages = match storage.execute(endpoint.procedure, args).await {
        Ok(messages) => messages,
        Err(e) => return Ok(handle_error(endpoint, &e, &fallback)),
    };

    if ProcMessage::is_success(&messages) {
        let message = messages
            .first()
            .map(|m| m.message.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| endpoint.action.success_message(resource.subject));
        Ok(HttpResponse::Ok().json(ApiResponse::success(messages, message)))
    } else {
        info!(
            "{} rejected: {:?}",
            endpoint.procedure,
            messages.first().map(|m| (m.code, m.message.as_str()))
        );
        Ok(HttpResponse::BadRequest().json(ApiResponse::failure(messages, fallback)))
    }
}
