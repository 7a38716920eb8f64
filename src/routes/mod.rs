pub mod auth;

pub mod health;

pub mod portals;

pub use auth::configure_auth_routes;
pub use health::configure_health_routes;
pub use portals::configure_portal_routes;

use actix_web::HttpResponse;

use crate::models::ApiResponse;

/// 未匹配任何路由时的兜底响应
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure_empty("Route not found"))
}
