use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;

use crate::errors::Result;
use crate::models::{
    ApiResponse,
    auth::{LoginAccount, LoginRequest, LoginResponse},
};
use crate::storage::Storage;
use crate::utils::jwt;
use crate::utils::password::verify_password;
use crate::utils::validate::validate_login_name;

use super::AuthService;

const LOGIN_PROCEDURE: &str = "sp_auth_login";
const BAD_CREDENTIALS: &str = "Username or password is incorrect";

/// 按用户名或邮箱取账号，登录和刷新令牌共用
pub(super) async fn find_account(storage: &dyn Storage, username: &str) -> Result<Option<LoginAccount>> {
    let rows = storage
        .query(LOGIN_PROCEDURE, vec![Value::String(username.to_string())])
        .await?;
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value::<LoginAccount>(row)?)),
        None => Ok(None),
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();

    let username = login_request.username.trim();
    if let Err(msg) = validate_login_name(username) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::failure_empty(msg)));
    }
    if login_request.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::failure_empty("Password is required")));
    }

    // 1. 按用户名或邮箱取账号
    let account = match find_account(storage.as_ref(), username).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            tracing::info!("Login failed for unknown account {}", username);
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::failure_empty(BAD_CREDENTIALS)));
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::failure_empty("Login failed, please try again later")));
        }
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &account.password_hash) {
        tracing::info!("Login failed for {}: wrong password", account.username);
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::failure_empty(BAD_CREDENTIALS)));
    }

    if !account.is_active {
        tracing::info!("Login refused for inactive account {}", account.username);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::failure_empty("Account is disabled")));
    }

    // 3. 生成令牌对
    let user = account.to_auth_user();
    let refresh_days = if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };

    match jwt::JwtUtils::generate_token_pair(&user, Some(chrono::Duration::days(refresh_days))) {
        Ok(token_pair) => {
            tracing::info!("User {} ({}) logged in", user.username, user.assign_type);

            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60,
                user,
            };
            let refresh_cookie =
                jwt::JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_days);

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::failure_empty(
                "Login failed, unable to generate token",
            )))
        }
    }
}
