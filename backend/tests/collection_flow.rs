//! End-to-end collection workflow over the HTTP adapter.
//!
//! Real domain services run behind the real handlers; only the driven ports
//! are replaced with in-memory doubles.

#[path = "collection_flow/memory.rs"]
mod memory;

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use cleanbee::domain::ports::{
    CollectionTaskCommand, CollectionTaskQuery, ImpactQuery, ReportCommand, ReportQuery,
    RewardsCommand, RewardsQuery,
};
use cleanbee::domain::{
    COLLECTION_REWARD_RANGE, CollectionTaskService, GeocodingService, ImpactService,
    NotificationService, REPORT_REWARD, ReportService, RewardsService, UniformRewardPolicy,
    UserOnboardingService,
};
use cleanbee::inbound::http::configure_api;
use cleanbee::inbound::http::state::HttpState;
use memory::{MemoryStore, ScriptedClassifier, SilentGeocoder};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PNG: &str = "iVBORw0KGgo=";

struct World {
    store: MemoryStore,
    state: HttpState,
}

fn world_with(classifier: ScriptedClassifier) -> World {
    let store = MemoryStore::default();
    let repo = Arc::new(store.clone());
    let classifier = Arc::new(classifier);
    let clock = Arc::new(DefaultClock);
    let policy = Arc::new(UniformRewardPolicy::seeded(7));

    let reports = Arc::new(ReportService::new(
        repo.clone(),
        classifier.clone(),
        policy.clone(),
        clock.clone(),
    ));
    let tasks = Arc::new(CollectionTaskService::new(
        repo.clone(),
        classifier,
        policy,
        clock.clone(),
    ));
    let rewards = Arc::new(RewardsService::new(repo.clone(), clock.clone()));

    let state = HttpState {
        onboarding: Arc::new(UserOnboardingService::new(repo.clone(), clock)),
        reports: reports.clone() as Arc<dyn ReportCommand>,
        reports_query: reports as Arc<dyn ReportQuery>,
        tasks: tasks.clone() as Arc<dyn CollectionTaskCommand>,
        tasks_query: tasks as Arc<dyn CollectionTaskQuery>,
        rewards: rewards.clone() as Arc<dyn RewardsCommand>,
        rewards_query: rewards as Arc<dyn RewardsQuery>,
        impact: Arc::new(ImpactService::new(repo.clone())) as Arc<dyn ImpactQuery>,
        notifications: Arc::new(NotificationService::new(repo)),
        geocoding: Arc::new(GeocodingService::new(Arc::new(SilentGeocoder))),
    };
    World { store, state }
}

#[fixture]
fn passing_world() -> World {
    world_with(ScriptedClassifier::new(true, true, 0.92))
}

async fn app(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

async fn login<S>(app: &S, email: &str, name: &str) -> (Cookie<'static>, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "name": name }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();
    let body: Value = test::read_body_json(res).await;
    (cookie, body)
}

async fn call<S>(
    app: &S,
    req: test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = match cookie {
        Some(cookie) => req.cookie(cookie.clone()),
        None => req,
    };
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn report_body() -> Value {
    json!({
        "location": "12 Harbour Road",
        "type": "plastic",
        "amount": "3 bags",
        "verificationStatus": "success",
        "verification": { "wasteType": "plastic", "quantity": "3 bags", "confidence": 0.92 },
        "image": { "mimeType": "image/png", "data": PNG },
    })
}

fn verify_body() -> Value {
    json!({ "image": { "mimeType": "image/png", "data": PNG } })
}

async fn submit_and_find_task<S>(app: &S, reporter: &Cookie<'static>) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = call(
        app,
        test::TestRequest::post()
            .uri("/api/v1/reports")
            .set_json(report_body()),
        Some(reporter),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["task"]["id"].as_str().expect("task id").to_owned()
}

#[rstest]
#[actix_web::test]
async fn report_claim_verify_and_spend(passing_world: World) {
    let World { store, state } = passing_world;
    let app = app(state).await;
    let (reporter, _) = login(&app, "ada@example.org", "Ada").await;
    let (collector, collector_body) = login(&app, "grace@example.org", "Grace").await;

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/reports")
            .set_json(report_body()),
        Some(&reporter),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rewardPoints"], json!(REPORT_REWARD));
    assert_eq!(body["task"]["status"], "pending");
    let task_id = body["task"]["id"].as_str().expect("task id").to_owned();

    let (_, listing) = call(&app, test::TestRequest::get().uri("/api/v1/tasks"), None).await;
    assert_eq!(listing["totalItems"], 1);
    assert_eq!(listing["items"][0]["id"], task_id.as_str());

    let claim_uri = format!("/api/v1/tasks/{task_id}/claim");
    let (status, claimed) = call(
        &app,
        test::TestRequest::post().uri(&claim_uri),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claimed["status"], "in_progress");
    assert_eq!(claimed["collectorId"], collector_body["id"]);

    let (status, _) = call(
        &app,
        test::TestRequest::post().uri(&claim_uri),
        Some(&reporter),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let verify_uri = format!("/api/v1/tasks/{task_id}/verify");
    let (status, verified) = call(
        &app,
        test::TestRequest::post()
            .uri(&verify_uri)
            .set_json(verify_body()),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["outcome"], "verified");
    assert_eq!(verified["task"]["status"], "verified");
    let points = verified["reward"]["amount"].as_u64().expect("reward amount");
    assert!(COLLECTION_REWARD_RANGE.contains(&u32::try_from(points).expect("u32 points")));

    let (_, replay) = call(
        &app,
        test::TestRequest::post()
            .uri(&verify_uri)
            .set_json(verify_body()),
        Some(&collector),
    )
    .await;
    assert_eq!(replay["reward"]["id"], verified["reward"]["id"]);
    let task_uuid = task_id.parse().expect("uuid");
    assert_eq!(store.ledger_rows_for_task(task_uuid), 1);

    let (_, balance) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/rewards/balance"),
        Some(&collector),
    )
    .await;
    assert_eq!(balance["balance"], points);

    let (_, unread) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/notifications"),
        Some(&collector),
    )
    .await;
    let unread = unread.as_array().expect("notification list");
    assert_eq!(unread.len(), 1);
    let notification_id = unread[0]["id"].as_str().expect("notification id");
    let (status, _) = call(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/notifications/{notification_id}/read")),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, refused) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/rewards/redeem")
            .set_json(json!({ "amount": points + 1, "description": "Tote bag" })),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(refused["details"]["available"], points);

    let (status, spent) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/rewards/redeem")
            .set_json(json!({ "amount": points, "description": "Tote bag" })),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spent["balance"], 0);

    let (_, board) = call(&app, test::TestRequest::get().uri("/api/v1/leaderboard"), None).await;
    let names: Vec<&str> = board["items"]
        .as_array()
        .expect("leaderboard items")
        .iter()
        .filter_map(|entry| entry["userName"].as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Ada") && names.contains(&"Grace"));
}

#[rstest]
#[case::type_mismatch(false, true, 0.95)]
#[case::quantity_mismatch(true, false, 0.95)]
#[case::at_threshold(true, true, 0.7)]
#[actix_web::test]
async fn failed_verification_changes_nothing(
    #[case] waste_type_match: bool,
    #[case] quantity_match: bool,
    #[case] confidence: f64,
) {
    let World { store, state } =
        world_with(ScriptedClassifier::new(waste_type_match, quantity_match, confidence));
    let app = app(state).await;
    let (reporter, _) = login(&app, "ada@example.org", "Ada").await;
    let (collector, _) = login(&app, "grace@example.org", "Grace").await;
    let task_id = submit_and_find_task(&app, &reporter).await;

    let (status, _) = call(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/tasks/{task_id}/claim")),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/tasks/{task_id}/verify"))
            .set_json(verify_body()),
        Some(&collector),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "rejected");
    assert_eq!(body["task"]["status"], "in_progress");
    assert!(body["reward"].is_null());
    assert_eq!(store.ledger_rows_for_task(task_id.parse().expect("uuid")), 0);

    let (_, balance) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/rewards/balance"),
        Some(&collector),
    )
    .await;
    assert_eq!(balance["balance"], 0);
}

#[rstest]
#[actix_web::test]
async fn concurrent_claims_have_one_winner(passing_world: World) {
    let World { store, state } = passing_world;
    let app = app(state).await;
    let (reporter, _) = login(&app, "ada@example.org", "Ada").await;
    let (first, _) = login(&app, "grace@example.org", "Grace").await;
    let (second, _) = login(&app, "alan@example.org", "Alan").await;
    let task_id = submit_and_find_task(&app, &reporter).await;
    assert_eq!(store.task_count(), 1);

    let uri = format!("/api/v1/tasks/{task_id}/claim");
    let ((a, _), (b, _)) = futures::join!(
        call(&app, test::TestRequest::post().uri(&uri), Some(&first)),
        call(&app, test::TestRequest::post().uri(&uri), Some(&second)),
    );
    let mut statuses = [a, b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

#[rstest]
#[actix_web::test]
async fn unauthenticated_writes_are_rejected(passing_world: World) {
    let app = app(passing_world.state).await;
    let (status, body) = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/reports")
            .set_json(report_body()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn reverse_geocode_falls_back_to_coordinates(passing_world: World) {
    let app = app(passing_world.state).await;
    let (status, body) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/geocode/reverse?lat=51.5&lng=-0.1276"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "51.500000, -0.127600");
}

#[rstest]
#[actix_web::test]
async fn impact_sums_reported_amounts(passing_world: World) {
    let app = app(passing_world.state).await;
    let (_, empty) = call(&app, test::TestRequest::get().uri("/api/v1/impact"), None).await;
    assert_eq!(empty["wasteCollected"], json!(0.0));
    assert_eq!(empty["reportsSubmitted"], 0);

    let (reporter, _) = login(&app, "ada@example.org", "Ada").await;
    submit_and_find_task(&app, &reporter).await;
    submit_and_find_task(&app, &reporter).await;

    let (status, impact) = call(&app, test::TestRequest::get().uri("/api/v1/impact"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(impact["wasteCollected"], json!(6.0));
    assert_eq!(impact["co2Offset"], json!(3.0));
    assert_eq!(impact["reportsSubmitted"], 2);
    assert_eq!(impact["tokensEarned"], json!(2 * REPORT_REWARD));
}

#[rstest]
#[actix_web::test]
async fn own_leaderboard_row_keeps_rank(passing_world: World) {
    let app = app(passing_world.state).await;
    let (first, _) = login(&app, "ada@example.org", "Ada").await;
    let (second, _) = login(&app, "grace@example.org", "Grace").await;
    submit_and_find_task(&app, &first).await;
    submit_and_find_task(&app, &first).await;
    submit_and_find_task(&app, &second).await;

    let (status, mine) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/leaderboard?mine=true"),
        Some(&second),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["totalItems"], 1);
    assert_eq!(mine["items"][0]["userName"], "Grace");
    assert_eq!(mine["items"][0]["rank"], 2);

    let (status, _) = call(
        &app,
        test::TestRequest::get().uri("/api/v1/leaderboard?mine=true"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
