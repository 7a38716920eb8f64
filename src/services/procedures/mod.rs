pub mod args;
pub mod list;
pub mod read;
pub mod write;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::ObjectCache;
use crate::catalog::{Endpoint, Operation, Resource};
use crate::errors::AttendanceError;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::storage::Storage;

use args::{ArgContext, ArgError, resolve_args};

/// 通用存储过程控制器：解析参数，调用一个存储过程，包装结果
pub struct ProcedureService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProcedureService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub fn with_storage(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        if let Some(storage) = &self.storage {
            return Ok(storage.clone());
        }
        request
            .app_data::<web::Data<Arc<dyn Storage>>>()
            .map(|data| data.get_ref().clone())
            .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
        request
            .app_data::<web::Data<Arc<dyn ObjectCache>>>()
            .map(|data| data.get_ref().clone())
    }

    pub async fn dispatch(
        &self,
        resource: &'static Resource,
        endpoint: &'static Endpoint,
        request: &HttpRequest,
        body: &[u8],
    ) -> ActixResult<HttpResponse> {
        let user = RequireJWT::extract_user(request);

        let ctx = match ArgContext::from_request(request, body, user) {
            Ok(ctx) => ctx,
            Err(e) => return Ok(arg_error_response(endpoint, &e)),
        };
        let args = match resolve_args(endpoint.args, &ctx) {
            Ok(args) => args,
            Err(e) => return Ok(arg_error_response(endpoint, &e)),
        };

        match endpoint.action.operation() {
            Operation::Paged => list::handle_list(self, request, resource, endpoint, &ctx, args).await,
            Operation::One => read::handle_get(self, request, resource, endpoint, args).await,
            Operation::Many => read::handle_rows(self, request, resource, endpoint, args).await,
            Operation::Write => write::handle_write(self, request, resource, endpoint, args).await,
        }
    }
}

/// 存储层异常统一记录日志并返回 500
pub(crate) fn handle_error(endpoint: &Endpoint, err: &AttendanceError, message: &str) -> HttpResponse {
    error!(
        "{} failed [{}]: {}",
        endpoint.procedure,
        err.code(),
        err
    );
    HttpResponse::InternalServerError().json(ApiResponse::failure_empty(message))
}

fn arg_error_response(endpoint: &Endpoint, err: &ArgError) -> HttpResponse {
    if let ArgError::Internal(_) = err {
        error!("{}: {}", endpoint.procedure, err);
    }
    HttpResponse::build(err.status()).json(ApiResponse::failure_empty(err.to_string()))
}
