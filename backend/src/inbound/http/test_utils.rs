//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use std::sync::Arc;

use crate::domain::ports::{
    MockCollectionTaskCommand, MockCollectionTaskQuery, MockGeocodingQuery, MockImpactQuery,
    MockNotificationsCommand, MockReportCommand, MockReportQuery, MockRewardsCommand,
    MockRewardsQuery, MockUserOnboarding,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

const SEED_SESSION_PATH: &str = "/test/session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port; unconfigured mocks fail the test if called.
#[derive(Default)]
pub struct MockPorts {
    pub onboarding: MockUserOnboarding,
    pub reports: MockReportCommand,
    pub reports_query: MockReportQuery,
    pub impact: MockImpactQuery,
    pub tasks: MockCollectionTaskCommand,
    pub tasks_query: MockCollectionTaskQuery,
    pub rewards: MockRewardsCommand,
    pub rewards_query: MockRewardsQuery,
    pub notifications: MockNotificationsCommand,
    pub geocoding: MockGeocodingQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            onboarding: Arc::new(self.onboarding),
            reports: Arc::new(self.reports),
            reports_query: Arc::new(self.reports_query),
            impact: Arc::new(self.impact),
            tasks: Arc::new(self.tasks),
            tasks_query: Arc::new(self.tasks_query),
            rewards: Arc::new(self.rewards),
            rewards_query: Arc::new(self.rewards_query),
            notifications: Arc::new(self.notifications),
            geocoding: Arc::new(self.geocoding),
        }
    }
}

async fn seed_session(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = parse_uuid(&path.into_inner(), FieldName::new("userId"))?;
    session.persist_user(&UserId::from_uuid(id))?;
    Ok(HttpResponse::NoContent().finish())
}

/// The full `/api/v1` surface over mocked ports, plus a route that logs a
/// user in without going through `POST /login`.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .route(
            &format!("{SEED_SESSION_PATH}/{{user_id}}"),
            web::post().to(seed_session),
        )
        .service(web::scope("/api/v1").configure(super::configure_api))
}

/// Session cookie for `user`, minted through the seeding route.
pub async fn session_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri(&format!("{SEED_SESSION_PATH}/{user}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "session seeding failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
