use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;

use super::{ProcedureService, handle_error};
use super::args::ArgContext;
use crate::catalog::{Endpoint, Resource};
use crate::models::{ApiResponse, ListResponse};

/// 分页列表。页码超出范围时过程返回空行，total 仍是真实总数
pub async fn handle_list(
    service: &ProcedureService,
    request: &HttpRequest,
    resource: &Resource,
    endpoint: &Endpoint,
    ctx: &ArgContext,
    args: Vec<Value>,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = match ctx.pagination() {
        Ok(paging) => paging,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::failure_empty(e.to_string())));
        }
    };

    match storage.query_paged(endpoint.procedure, args).await {
        Ok(paged) => {
            let response = ListResponse::new(paged.rows, paged.total, page, size);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                endpoint.action.success_message(resource.subject),
            )))
        }
        Err(e) => Ok(handle_error(
            endpoint,
            &e,
            &endpoint.action.fallback_message(resource.subject),
        )),
    }
}
