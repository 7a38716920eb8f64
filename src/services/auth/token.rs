use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::CacheResult;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::ApiResponse;
use crate::models::auth::{RefreshTokenResponse, UserInfoResponse};
use crate::utils::jwt;

use super::AuthService;
use super::login::find_account;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::failure_empty("Unauthorized access, please login")));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_session());
        }
    };

    // 登出时 refresh token 也会被吊销
    if let Some(revocations) = service.get_revocations(request)
        && let CacheResult::Found(_) = revocations.lookup(&claims.jti).await
    {
        tracing::info!("Revoked refresh token presented by user {}", claims.sub);
        return Ok(expired_session());
    }

    // 重新读取账号，停用或改角色后不再按旧声明签发
    let storage = service.get_storage(request)?;
    let account = match find_account(storage.as_ref(), &claims.username).await {
        Ok(Some(account)) if account.user_id.to_string() == claims.sub => account,
        Ok(_) => {
            tracing::info!("Refresh token of user {} no longer matches an account", claims.sub);
            return Ok(expired_session());
        }
        Err(e) => {
            tracing::error!("Refresh account lookup failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::failure_empty(
                "Token refresh failed, please try again later",
            )));
        }
    };

    if !account.is_active {
        tracing::info!("Refresh refused for inactive account {}", account.username);
        return Ok(HttpResponse::Forbidden()
            .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
            .json(ApiResponse::failure_empty("Account is disabled")));
    }

    match jwt::JwtUtils::generate_access_token(&account.to_auth_user()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            Ok(expired_session())
        }
    }
}

// 同时清除无效的 refresh token cookie
fn expired_session() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::failure_empty(
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::failure_empty("Unauthorized access, please login"))),
    }
}
