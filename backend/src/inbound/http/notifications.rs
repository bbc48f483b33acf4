//! Notification inbox handlers.
//!
//! ```text
//! GET /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::NotificationDto;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

const NOTIFICATION_ID: FieldName = FieldName::new("notificationId");

/// Unread notifications of the signed-in user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Unread notifications", body = [NotificationDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_unread(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<NotificationDto>>> {
    let user_id = session.require_user_id()?;
    let notifications = state.notifications.unread(&user_id).await?;
    Ok(web::Json(
        notifications.iter().map(NotificationDto::from).collect(),
    ))
}

/// Mark one of the caller's notifications as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "No such notification for this user", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_uuid(&path.into_inner(), NOTIFICATION_ID)?;
    state.notifications.mark_read(&user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::fixture_timestamp;
    use crate::domain::{Error, Notification, NotificationKind, UserId};
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use mockall::predicate::eq;
    use serde_json::Value;
    use uuid::Uuid;

    #[actix_web::test]
    async fn unread_lists_session_users_inbox() {
        let user = UserId::random();
        let notification = Notification::unread(
            Uuid::new_v4(),
            user.clone(),
            NotificationKind::Reward,
            "You earned 12 points for collecting waste!",
            fixture_timestamp(),
        );
        let mut ports = MockPorts::default();
        ports
            .notifications
            .expect_unread()
            .with(eq(user.clone()))
            .times(1)
            .returning(move |_| Ok(vec![notification.clone()]));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &user).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/notifications")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("response JSON");
        assert_eq!(value[0]["type"], "reward");
        assert_eq!(value[0]["isRead"], false);
    }

    #[actix_web::test]
    async fn mark_read_returns_no_content() {
        let user = UserId::random();
        let id = Uuid::new_v4();
        let mut ports = MockPorts::default();
        ports
            .notifications
            .expect_mark_read()
            .with(eq(user.clone()), eq(id))
            .times(1)
            .returning(|_, _| Ok(()));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &user).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/notifications/{id}/read"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn foreign_notification_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .notifications
            .expect_mark_read()
            .returning(|_, _| Err(Error::not_found("notification not found")));
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = session_cookie(&app, &UserId::random()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/notifications/{}/read", Uuid::new_v4()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn inbox_requires_session() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/notifications")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
