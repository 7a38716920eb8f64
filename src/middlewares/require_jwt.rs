/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>`，通过后把 [`AuthUser`] 与 [`Claims`]
 * 写入请求扩展，供角色中间件和处理程序读取。
 *
 * ```rust,ignore
 * web::scope("/api/admin-portal")
 *     .wrap(RequireRole::new_any(AssignType::admin_roles()))
 *     .wrap(RequireJWT) // 最后 wrap 的最先执行
 * ```
 *
 * 以下情况返回 401：
 * - 请求头缺失或不是 Bearer 格式
 * - 签名错误、格式错误、已过期或不是 access token
 * - token 已在登出时被吊销
 */

use crate::cache::{CacheResult, RevocationList};
use crate::models::auth::AuthUser;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

pub(crate) fn extract_bearer_token(req: &ServiceRequest) -> Result<&str, String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .ok_or_else(|| "Missing Authorization header".to_string())?
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| "Malformed bearer token".to_string())
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<(AuthUser, Claims), String> {
    let token = extract_bearer_token(req)?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    if let Some(revocations) = req.app_data::<web::Data<RevocationList>>() {
        match revocations.lookup(&claims.jti).await {
            CacheResult::Found(_) => return Err("Token has been revoked".to_string()),
            CacheResult::ExistsButNoValue => warn!(
                "Revocation list unavailable, accepting token {} of user {} unchecked",
                claims.jti, claims.sub
            ),
            CacheResult::NotFound => {}
        }
    }

    let user = claims
        .to_auth_user()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;

    Ok((user, claims))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求不带令牌
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, "").map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok((user, claims)) => {
                    debug!(
                        "JWT authentication successful for user {} ({})",
                        user.user_id, user.assign_type
                    );
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert(claims);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取认证用户，需在 RequireJWT 之后调用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<AuthUser> {
        req.extensions().get::<AuthUser>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<AuthUser>().map(|user| user.user_id)
    }

    pub fn extract_claims(req: &actix_web::HttpRequest) -> Option<Claims> {
        req.extensions().get::<Claims>().cloned()
    }
}
