/*!
 * 基于账号类型的访问控制中间件
 *
 * 必须在 RequireJWT 之后执行。`assign_type` 属于给定集合时放行，否则 403；
 * 请求上没有认证用户时返回 401。
 *
 * ```rust,ignore
 * web::scope("/api/mobile-app")
 *     .wrap(RequireRole::new_any(AssignType::mobile_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::auth::{AssignType, AuthUser};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[AssignType]>,
}

impl RequireRole {
    pub fn new(role: AssignType) -> Self {
        Self::new_any(&[role])
    }

    pub fn new_any(roles: &[AssignType]) -> Self {
        Self {
            allowed: Rc::from(roles),
        }
    }

    pub fn permits(&self, user: &AuthUser) -> bool {
        self.allowed.contains(&user.assign_type)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let rule = self.rule.clone();

        Box::pin(async move {
            let user = req.extensions().get::<AuthUser>().cloned();

            match user {
                Some(user) if rule.permits(&user) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Access denied for user {} ({}) on {}. Allowed: {:?}",
                        user.user_id,
                        user.assign_type,
                        req.path(),
                        rule.allowed
                    );
                    Ok(req.into_response(
                        create_error_response(StatusCode::FORBIDDEN, "Access denied.")
                            .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: no authenticated user on {}. Is RequireJWT applied first?",
                        req.path()
                    );
                    Ok(req.into_response(
                        create_error_response(StatusCode::UNAUTHORIZED, "Authentication required")
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(assign_type: AssignType) -> AuthUser {
        AuthUser {
            user_id: 1,
            email: String::new(),
            username: "u".to_string(),
            assign_type,
            assign_to: None,
        }
    }

    #[test]
    fn test_admin_rule() {
        let rule = RequireRole::new(AssignType::Admin);
        assert!(rule.permits(&user(AssignType::Admin)));
        assert!(!rule.permits(&user(AssignType::Lecturer)));
    }

    #[test]
    fn test_mobile_rule_accepts_students_and_lecturers() {
        let rule = RequireRole::new_any(AssignType::mobile_roles());
        assert!(rule.permits(&user(AssignType::Student)));
        assert!(rule.permits(&user(AssignType::Lecturer)));
        assert!(!rule.permits(&user(AssignType::Admin)));
    }
}
