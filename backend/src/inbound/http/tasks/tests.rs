//! Handler coverage for listing, claiming and verifying tasks.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use pagination::Page;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{
    ClaimTaskRequest, ListTasksRequest, VerifyTaskRequest, VerifyTaskResponse,
};
use crate::domain::test_fixtures::{ledger_row, task_with, verification};
use crate::domain::{Error, TaskStatus, TransactionKind, UserId};
use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_app};

const PNG: &str = "iVBORw0KGgo=";

async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("response JSON")
}

fn image_body() -> Value {
    json!({"image": {"mimeType": "image/png", "data": PNG}})
}

#[actix_web::test]
async fn list_tasks_defaults_to_five_per_page() {
    let mut ports = MockPorts::default();
    ports
        .tasks_query
        .expect_list_tasks()
        .withf(|request: &ListTasksRequest| {
            request.page.page() == 2
                && request.page.per_page() == 5
                && request.search.as_deref() == Some(" harbour")
        })
        .times(1)
        .returning(|request| {
            Ok(Page::new(
                vec![task_with(TaskStatus::Pending, None)],
                request.page,
                6,
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tasks?page=2&search=%20harbour")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value["totalItems"], 6);
    assert_eq!(value["totalPages"], 2);
    assert_eq!(value["items"][0]["status"], "pending");
    assert!(value["links"].get("next").is_none());
    assert!(
        value["links"]["prev"]
            .as_str()
            .is_some_and(|link| link.contains("page=1") && link.contains("search="))
    );
}

#[rstest]
#[case::page_zero("page=0", "page")]
#[case::oversized("perPage=101", "perPage")]
#[actix_web::test]
async fn list_tasks_rejects_bad_paging(#[case] query: &str, #[case] field: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/tasks?{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(value["details"]["field"], field);
}

#[actix_web::test]
async fn claim_uses_session_user_as_collector() {
    let collector = UserId::random();
    let task = task_with(TaskStatus::InProgress, Some(collector.clone()));
    let task_id = task.id();
    let mut ports = MockPorts::default();
    let expected = collector.clone();
    ports
        .tasks
        .expect_claim_task()
        .withf(move |request: &ClaimTaskRequest| {
            request.task_id == task_id && request.collector == expected
        })
        .times(1)
        .returning(move |_| Ok(task.clone()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, &collector).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{task_id}/claim"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value["status"], "in_progress");
    assert_eq!(value["collectorId"], json!(collector.to_string()));
}

#[actix_web::test]
async fn claim_conflict_is_409() {
    let mut ports = MockPorts::default();
    ports.tasks.expect_claim_task().returning(|_| {
        Err(Error::conflict("task already claimed")
            .with_details(json!({"code": "already_claimed"})))
    });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, &UserId::random()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{}/claim", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value = read_json(response).await;
    assert_eq!(value["details"]["code"], "already_claimed");
}

#[rstest]
#[case::claim("claim")]
#[case::verify("verify")]
#[actix_web::test]
async fn task_commands_require_session(#[case] action: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{}/{action}", uuid::Uuid::new_v4()))
            .set_json(image_body())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn claim_rejects_malformed_id() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = session_cookie(&app, &UserId::random()).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/tasks/not-a-uuid/claim")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(value["details"]["field"], "taskId");
    assert_eq!(value["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn verified_collection_returns_reward() {
    let collector = UserId::random();
    let task = task_with(TaskStatus::Verified, Some(collector.clone()));
    let task_id = task.id();
    let reward = ledger_row(&collector, TransactionKind::EarnedCollect, 42, Some(task_id));
    let mut ports = MockPorts::default();
    let response_body = VerifyTaskResponse::Verified {
        task,
        verification: Some(verification(true, true, 0.9)),
        reward,
    };
    ports
        .tasks
        .expect_verify_task()
        .withf(move |request: &VerifyTaskRequest| request.task_id == task_id)
        .times(1)
        .returning(move |_| Ok(response_body.clone()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, &collector).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{task_id}/verify"))
            .cookie(cookie)
            .set_json(image_body())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value["outcome"], "verified");
    assert_eq!(value["task"]["status"], "verified");
    assert_eq!(value["verification"]["passed"], true);
    assert_eq!(value["reward"]["amount"], 42);
    assert_eq!(value["reward"]["type"], "earned_collect");
    assert_eq!(value["reward"]["taskId"], json!(task_id));
}

#[actix_web::test]
async fn rejected_photo_is_not_an_error() {
    let collector = UserId::random();
    let task = task_with(TaskStatus::InProgress, Some(collector.clone()));
    let task_id = task.id();
    let mut ports = MockPorts::default();
    let response_body = VerifyTaskResponse::Rejected {
        task,
        verification: verification(true, false, 0.95),
    };
    ports
        .tasks
        .expect_verify_task()
        .returning(move |_| Ok(response_body.clone()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, &collector).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{task_id}/verify"))
            .cookie(cookie)
            .set_json(image_body())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let value = read_json(response).await;
    assert_eq!(value["outcome"], "rejected");
    assert_eq!(value["task"]["status"], "in_progress");
    assert_eq!(value["verification"]["quantityMatch"], false);
    assert_eq!(value["verification"]["passed"], false);
    assert!(value["reward"].is_null());
}

#[actix_web::test]
async fn verify_rejects_missing_image_data() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let cookie = session_cookie(&app, &UserId::random()).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{}/verify", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .set_json(json!({"image": {"mimeType": "image/png", "data": ""}}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value = read_json(response).await;
    assert_eq!(value["details"]["field"], "image");
}
