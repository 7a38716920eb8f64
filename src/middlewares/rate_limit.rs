/*!
 * 速率限制中间件
 *
 * 固定窗口计数。已认证请求按用户 ID 计数，否则按客户端 IP。
 * 超过限制返回 429，并带 `Retry-After`。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(auth::login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{self, LocalBoxFuture, Ready, ready};
use moka::Expiry;
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::auth::AuthUser;

#[derive(Clone, Copy)]
struct Window {
    count: u32,
    length: Duration,
}

/// 窗口从第一次请求开始计时，后续计数不延长窗口
struct FixedWindow;

impl Expiry<String, Window> for FixedWindow {
    fn expire_after_create(&self, _key: &String, value: &Window, _created_at: Instant) -> Option<Duration> {
        Some(value.length)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        _value: &Window,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        duration_until_expiry
    }
}

/// 全局计数表，所有 worker 共享
/// 键: 前缀:user:ID 或 前缀:ip:地址
static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .expire_after(FixedWindow)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.max(1),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 扫码签到：20次/分钟/用户
    pub fn attendance_scan() -> Self {
        Self::new(20, 60).with_prefix("scan")
    }

    fn cache_key(&self, identifier: &str) -> String {
        if self.key_prefix.is_empty() {
            identifier.to_string()
        } else {
            format!("{}:{}", self.key_prefix, identifier)
        }
    }
}

/// 客户端 IP。只有 `server.trust_proxy_headers` 打开时才读取
/// Forwarded / X-Forwarded-For / X-Real-IP，否则这些头可被客户端随意伪造
fn extract_client_ip(req: &ServiceRequest, trust_proxy_headers: bool) -> String {
    let peer_ip = req.peer_addr().map(|addr| addr.ip().to_string());
    if !trust_proxy_headers {
        return peer_ip.unwrap_or_else(|| "unknown".to_string());
    }

    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    peer_ip
        .or(connection_ip)
        .unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn extract_identifier(req: &ServiceRequest) -> String {
    // 先取出 user_id，释放 extensions 的借用，connection_info() 需要再次借用
    let user_id = req.extensions().get::<AuthUser>().map(|user| user.user_id);
    match user_id {
        Some(id) => format!("user:{id}"),
        None => format!(
            "ip:{}",
            extract_client_ip(req, AppConfig::get().server.trust_proxy_headers)
        ),
    }
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::failure_empty(
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let cache_key = limit.cache_key(&extract_identifier(&req));
            let length = Duration::from_secs(limit.window_secs);

            // 读改写在同一个 entry 上完成，并发请求不会读到同一个旧值
            let current_count = RATE_LIMIT_CACHE
                .entry(cache_key.clone())
                .and_upsert_with(|existing| {
                    let window = match existing {
                        Some(entry) => {
                            let window = entry.into_value();
                            Window {
                                count: window.count.saturating_add(1),
                                ..window
                            }
                        }
                        None => Window { count: 1, length },
                    };
                    future::ready(window)
                })
                .await
                .into_value()
                .count;

            if current_count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, 10);

        let scan = RateLimit::attendance_scan();
        assert_eq!(scan.key_prefix, "scan");
    }

    #[test]
    fn test_cache_key_prefix() {
        assert_eq!(RateLimit::new(1, 1).cache_key("ip:1.2.3.4"), "ip:1.2.3.4");
        assert_eq!(RateLimit::login().cache_key("ip:1.2.3.4"), "login:ip:1.2.3.4");
    }

    fn request_from(peer: &str) -> ServiceRequest {
        actix_web::test::TestRequest::default()
            .peer_addr(peer.parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .to_srv_request()
    }

    #[test]
    fn test_identifier_without_user_uses_peer_address() {
        let req = request_from("10.1.2.3:40000");
        assert_eq!(extract_identifier(&req), "ip:10.1.2.3");
    }

    #[test]
    fn test_identifier_prefers_authenticated_user() {
        let req = request_from("10.1.2.3:40000");
        req.extensions_mut().insert(AuthUser {
            user_id: 77,
            email: "a@uni.test".to_string(),
            username: "a".to_string(),
            assign_type: crate::models::auth::AssignType::Student,
            assign_to: Some(1),
        });
        assert_eq!(extract_identifier(&req), "user:77");
    }

    #[test]
    fn test_forwarded_headers_only_when_trusted() {
        let req = request_from("10.1.2.3:40000");
        assert_eq!(extract_client_ip(&req, false), "10.1.2.3");
        assert_eq!(extract_client_ip(&req, true), "203.0.113.9");
    }

    #[actix_web::test]
    async fn test_concurrent_burst_is_capped() {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/burst")
                    .wrap(RateLimit::new(3, 60).with_prefix("burst-test"))
                    .route(web::post().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let requests = (0..10).map(|_| {
            let req = test::TestRequest::post()
                .uri("/burst")
                .peer_addr("10.9.9.9:5000".parse().unwrap())
                .to_request();
            test::call_service(&app, req)
        });
        let responses = futures_util::future::join_all(requests).await;

        let allowed = responses
            .iter()
            .filter(|resp| resp.status() == StatusCode::OK)
            .count();
        let limited = responses
            .iter()
            .filter(|resp| resp.status() == StatusCode::TOO_MANY_REQUESTS)
            .count();
        assert_eq!(allowed, 3);
        assert_eq!(limited, 7);
    }
}
