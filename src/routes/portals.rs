//! 把声明式路由表注册为 actix 路由
//!
//! 每个门户一个 scope，先经 RequireJWT 再经 RequireRole；
//! 同一路径的多个方法合并到一个 resource 上，保持声明顺序。

use actix_web::{HttpRequest, Route, Scope, web};
use once_cell::sync::Lazy;

use crate::catalog::{self, Action, Endpoint, HttpMethod, Portal, Resource};
use crate::middlewares::{RateLimit, RequireJWT, RequireRole};
use crate::services::ProcedureService;

static PROCEDURE_SERVICE: Lazy<ProcedureService> = Lazy::new(ProcedureService::new_lazy);

fn method_route(method: HttpMethod) -> Route {
    match method {
        HttpMethod::Get => web::get(),
        HttpMethod::Post => web::post(),
        HttpMethod::Put => web::put(),
        HttpMethod::Patch => web::patch(),
        HttpMethod::Delete => web::delete(),
    }
}

fn endpoint_route(resource: &'static Resource, endpoint: &'static Endpoint) -> Route {
    method_route(endpoint.method).to(move |req: HttpRequest, body: web::Bytes| async move {
        PROCEDURE_SERVICE
            .dispatch(resource, endpoint, &req, &body)
            .await
    })
}

/// 按首次出现的顺序列出资源内的不同路径
fn distinct_paths(resource: &Resource) -> Vec<&'static str> {
    let mut paths: Vec<&'static str> = Vec::new();
    for endpoint in resource.endpoints {
        if !paths.contains(&endpoint.path) {
            paths.push(endpoint.path);
        }
    }
    paths
}

fn resource_scope(resource: &'static Resource) -> Scope {
    let mut scope = web::scope(resource.path);

    for path in distinct_paths(resource) {
        let mut service = web::resource(path);
        let mut rate_limited = false;

        for endpoint in resource.endpoints.iter().filter(|e| e.path == path) {
            rate_limited |= endpoint.action == Action::Scan;
            service = service.route(endpoint_route(resource, endpoint));
        }

        scope = if rate_limited {
            scope.service(service.wrap(RateLimit::attendance_scan()))
        } else {
            scope.service(service)
        };
    }

    scope
}

pub fn configure_portal(cfg: &mut web::ServiceConfig, portal: &'static Portal) {
    let mut scope = web::scope(&portal.scope_path());
    for resource in portal.resources {
        scope = scope.service(resource_scope(resource));
    }

    // 最后 wrap 的最先执行
    cfg.service(
        scope
            .wrap(RequireRole::new_any(portal.roles))
            .wrap(RequireJWT),
    );
}

// 配置路由
pub fn configure_portal_routes(cfg: &mut web::ServiceConfig) {
    for portal in catalog::portals() {
        configure_portal(cfg, portal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_paths_keep_declaration_order() {
        let paths = distinct_paths(&catalog::admin::PORTAL.resources[0]);
        assert_eq!(paths, vec!["/list", "/search", "/formload", "", "/{id}"]);
    }
}
