//! Sign-in and profile handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.org","name":"Ada"}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::LoginRequest;
use crate::domain::{DisplayName, EmailAddress, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserDto;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{EMAIL, NAME, user_error};

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"email":"ada@example.org","name":"Ada Lovelace"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    #[schema(example = "ada@example.org")]
    pub email: String,
    /// Used only when the account is created.
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

impl TryFrom<LoginBody> for LoginRequest {
    type Error = Error;

    fn try_from(value: LoginBody) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&value.email).map_err(|err| user_error(EMAIL, &err))?;
        let display_name = value
            .name
            .map(DisplayName::new)
            .transpose()
            .map_err(|err| user_error(NAME, &err))?;
        Ok(Self {
            email,
            display_name,
        })
    }
}

/// Sign in by email, creating the account on first use, and establish a
/// session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Signed in", body = UserDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<UserDto>> {
    let request = LoginRequest::try_from(payload.into_inner())?;
    let user = state.onboarding.login(request).await?;
    session.persist_user(user.id())?;
    Ok(web::Json(UserDto::from(&user)))
}

/// End the session. Succeeds whether or not one existed.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The signed-in account.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use cleanbee::inbound::http::users::current_user;
///
/// let app = App::new().service(current_user);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserDto>> {
    let user_id = session.require_user_id()?;
    let user = state.onboarding.current_user(&user_id).await?;
    Ok(web::Json(UserDto::from(&user)))
}
