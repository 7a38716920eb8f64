//! `cache.formload_ttl = 0` 关闭 formload 缓存
//!
//! 配置是进程级单例，所以单独成一个测试二进制。

#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use attendance_server::config::AppConfig;
use attendance_server::models::auth::AssignType;
use common::{MockStorage, Reply, account, bearer};

#[actix_web::test]
async fn formload_ttl_zero_queries_every_time() {
    // 必须在第一次读取配置之前设置
    unsafe { std::env::set_var("ATTENDANCE__CACHE__FORMLOAD_TTL", "0") };
    assert_eq!(AppConfig::get().cache.formload_ttl, 0);

    let storage = Arc::new(MockStorage::new().reply(
        "sp_faculty_formload",
        Reply::Rows(vec![json!({ "faculty_id": 1, "faculty_name": "Science" })]),
    ));
    let app = test_app!(storage);
    let admin = account(1, AssignType::Admin, None);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/admin-portal/faculties/formload")
            .insert_header(bearer(&admin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["faculty_name"], json!("Science"));
    }

    assert_eq!(storage.calls_to("sp_faculty_formload").len(), 2);
}
