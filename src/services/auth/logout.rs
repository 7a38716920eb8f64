use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

/// 吊销当前 access token（以及 cookie 里的 refresh token）直到其自然过期，
/// 并让浏览器删除 refresh_token cookie
pub async fn handle_logout(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(revocations) = service.get_revocations(request) else {
        tracing::warn!("No revocation list configured, tokens stay valid until expiry");
        return Ok(logged_out());
    };

    if let Some(claims) = RequireJWT::extract_claims(request) {
        revocations
            .revoke(&claims.jti, &claims.sub, claims.remaining_secs())
            .await;
        tracing::info!("User {} logged out", claims.sub);
    }

    if let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request)
        && let Ok(refresh) = JwtUtils::verify_refresh_token(&refresh_token)
    {
        revocations
            .revoke(&refresh.jti, &refresh.sub, refresh.remaining_secs())
            .await;
    }

    Ok(logged_out())
}

// max_age=0 会让浏览器删除该 cookie
fn logged_out() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out successfully"))
}
