#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use attendance_server::models::auth::AssignType;
use attendance_server::models::procedures::PagedRows;
use common::{MockStorage, Reply, account, bearer, msg};

fn admin() -> attendance_server::models::auth::AuthUser {
    account(1, AssignType::Admin, None)
}

#[actix_web::test]
async fn list_with_out_of_range_page_returns_empty_rows_and_real_total() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_faculty_list",
        Reply::Paged(PagedRows {
            rows: vec![],
            total: 42,
        }),
    ));
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/faculties/list?page=99&size=10")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["rows"], json!([]));
    assert_eq!(body["data"]["total"], json!(42));
    assert_eq!(body["data"]["page"], json!(99));
    assert_eq!(body["data"]["total_pages"], json!(5));

    assert_eq!(
        storage.calls_to("sp_faculty_list"),
        vec![vec![Value::Null, json!(99), json!(10)]]
    );
}

#[actix_web::test]
async fn list_clamps_page_size() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_course_list",
        Reply::Paged(PagedRows {
            rows: vec![json!({ "course_id": 1 })],
            total: 1,
        }),
    ));
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/courses/list?size=5000&search=math")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        storage.calls_to("sp_course_list"),
        vec![vec![Value::Null, json!("math"), json!(1), json!(100)]]
    );
}

#[actix_web::test]
async fn write_with_code_zero_succeeds() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_faculty_create",
        Reply::Messages(vec![msg(0, "Faculty SCI created")]),
    ));
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/admin-portal/faculties")
        .insert_header(bearer(&admin()))
        .set_json(json!({ "faculty_code": "SCI", "faculty_name": "Science" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Faculty SCI created"));
    assert_eq!(
        storage.calls_to("sp_faculty_create"),
        vec![vec![json!("SCI"), json!("Science"), Value::Null, json!(1)]]
    );
}

#[actix_web::test]
async fn write_with_non_zero_code_returns_fallback_message() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_faculty_update",
        Reply::Messages(vec![msg(1062, "Duplicate faculty code")]),
    ));
    let app = test_app!(storage);

    let req = test::TestRequest::put()
        .uri("/api/admin-portal/faculties/3")
        .insert_header(bearer(&admin()))
        .set_json(json!({ "faculty_code": "SCI", "faculty_name": "Science" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Failed to update faculty"));
    assert_eq!(body["data"][0]["code"], json!(1062));
}

#[actix_web::test]
async fn write_without_messages_is_a_failure() {
    let storage = Arc::new(
        MockStorage::new().reply("sp_faculty_delete", Reply::Messages(vec![])),
    );
    let app = test_app!(storage);

    let req = test::TestRequest::delete()
        .uri("/api/admin-portal/faculties/3")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_required_field_is_rejected_before_the_call() {
    let storage = Arc::new(MockStorage::new());
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/admin-portal/faculties")
        .insert_header(bearer(&admin()))
        .set_json(json!({ "faculty_code": "SCI" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        json!("Missing required parameter: faculty_name")
    );
    assert!(storage.calls().is_empty());
}

#[actix_web::test]
async fn malformed_json_body_is_rejected() {
    let storage = Arc::new(MockStorage::new());
    let app = test_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/admin-portal/faculties")
        .insert_header(bearer(&admin()))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"faculty_code\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(storage.calls().is_empty());
}

#[actix_web::test]
async fn empty_result_is_reported_as_not_found() {
    let storage = Arc::new(MockStorage::new().reply("sp_faculty_get", Reply::Rows(vec![])));
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/faculties/5")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Faculty not found"));
    assert_eq!(body["data"], Value::Null);
    assert_eq!(storage.calls_to("sp_faculty_get"), vec![vec![json!(5)]]);
}

#[actix_web::test]
async fn non_numeric_id_is_a_bad_request() {
    let storage = Arc::new(MockStorage::new());
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/faculties/abc")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn static_paths_are_not_captured_by_id_routes() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_faculty_search",
        Reply::Rows(vec![json!({ "faculty_id": 1, "faculty_name": "Science" })]),
    ));
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/faculties/search?keyword=sci")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["faculty_name"], json!("Science"));
    assert!(storage.calls_to("sp_faculty_get").is_empty());
}

#[actix_web::test]
async fn storage_failure_returns_500_with_fallback_message() {
    let storage = Arc::new(
        MockStorage::new().reply("sp_faculty_get", Reply::Fail("Lost connection".to_string())),
    );
    let app = test_app!(storage);

    let req = test::TestRequest::get()
        .uri("/api/admin-portal/faculties/5")
        .insert_header(bearer(&admin()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Failed to retrieve faculty"));
}

#[actix_web::test]
async fn formload_is_cached_and_may_be_empty() {
    let storage = Arc::new(MockStorage::new().reply("sp_faculty_formload", Reply::Rows(vec![])));
    let app = test_app!(storage);

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/api/admin-portal/faculties/formload")
            .insert_header(bearer(&admin()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([]));
    }

    assert_eq!(storage.calls_to("sp_faculty_formload").len(), 1);
}

#[actix_web::test]
async fn lecturer_portal_binds_the_linked_lecturer_id() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_lecturer_student_leave_review",
        Reply::Messages(vec![msg(0, "Leave request approved")]),
    ));
    let app = test_app!(storage);
    let lecturer = account(20, AssignType::Lecturer, Some(7));

    let req = test::TestRequest::put()
        .uri("/api/lecturer-portal/student-leaves/11/review")
        .insert_header(bearer(&lecturer))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        storage.calls_to("sp_lecturer_student_leave_review"),
        vec![vec![json!(7), json!(11), json!("approved"), Value::Null]]
    );
}

#[actix_web::test]
async fn unlinked_account_is_forbidden() {
    let storage = Arc::new(MockStorage::new());
    let app = test_app!(storage);
    let lecturer = account(21, AssignType::Lecturer, None);

    let req = test::TestRequest::get()
        .uri("/api/lecturer-portal/profile")
        .insert_header(bearer(&lecturer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(storage.calls().is_empty());
}

#[actix_web::test]
async fn mobile_scan_accepts_students_and_lecturers_only() {
    let storage = Arc::new(MockStorage::new().reply(
        "sp_mobile_attendance_scan",
        Reply::Messages(vec![msg(0, "Checked in")]),
    ));
    let app = test_app!(storage);

    let student = account(30, AssignType::Student, Some(900));
    let req = test::TestRequest::post()
        .uri("/api/mobile-app/attendance/scan")
        .insert_header(bearer(&student))
        .set_json(json!({ "qr_token": "abc123", "latitude": 13.75, "longitude": "100.5" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        storage.calls_to("sp_mobile_attendance_scan"),
        vec![vec![
            json!(30),
            json!("student"),
            json!("abc123"),
            json!(13.75),
            json!(100.5),
            Value::Null
        ]]
    );

    let req = test::TestRequest::post()
        .uri("/api/mobile-app/attendance/scan")
        .insert_header(bearer(&admin()))
        .set_json(json!({ "qr_token": "abc123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn unknown_route_returns_envelope() {
    let storage = Arc::new(MockStorage::new());
    let app = test_app!(storage);

    let req = test::TestRequest::get().uri("/api/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
async fn health_reflects_database_reachability() {
    let healthy = Arc::new(MockStorage::new());
    let app = test_app!(healthy);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let down = Arc::new(MockStorage::unreachable());
    let app = test_app!(down);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["database"], json!(false));
}
