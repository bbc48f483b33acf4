//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes
//! - **Schemas**: request/response DTOs and the error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::dto::{
    ClassificationDto, ImagePayload, LeaderboardEntryDto, NotificationDto, PageLinksDto,
    PlaceDto, ReportDto, RewardTransactionDto, TaskDto, UserDto, VerificationDto,
};
use crate::inbound::http::geocoding::ReverseDto;
use crate::inbound::http::impact::ImpactDto;
use crate::inbound::http::reports::{ClassifyBody, SubmitReportBody, SubmitReportResponseDto};
use crate::inbound::http::rewards::{BalanceDto, RedeemBody, RedeemResponseDto};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorDetailsSchema, ErrorSchema};
use crate::inbound::http::tasks::{VerifyOutcome, VerifyTaskBody, VerifyTaskResponseDto};
use crate::inbound::http::users::LoginBody;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "CleanBee API",
        description = "Community waste reporting, collection tasks and rewards.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::reports::classify_image,
        crate::inbound::http::reports::submit_report,
        crate::inbound::http::reports::recent_reports,
        crate::inbound::http::impact::impact_summary,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::claim_task,
        crate::inbound::http::tasks::verify_task,
        crate::inbound::http::rewards::balance,
        crate::inbound::http::rewards::recent_transactions,
        crate::inbound::http::rewards::redeem,
        crate::inbound::http::rewards::leaderboard,
        crate::inbound::http::notifications::list_unread,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::geocoding::search,
        crate::inbound::http::geocoding::reverse,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ErrorDetailsSchema,
        LoginBody,
        UserDto,
        ImagePayload,
        ClassifyBody,
        ClassificationDto,
        SubmitReportBody,
        SubmitReportResponseDto,
        ReportDto,
        ImpactDto,
        TaskDto,
        VerifyTaskBody,
        VerifyOutcome,
        VerificationDto,
        VerifyTaskResponseDto,
        BalanceDto,
        RedeemBody,
        RedeemResponseDto,
        RewardTransactionDto,
        LeaderboardEntryDto,
        NotificationDto,
        PlaceDto,
        ReverseDto,
        PageLinksDto,
    )),
    tags(
        (name = "users", description = "Sign-in and profile"),
        (name = "reports", description = "Waste reports and photo classification"),
        (name = "tasks", description = "Collection tasks"),
        (name = "rewards", description = "Points, redemption and leaderboard"),
        (name = "notifications", description = "In-app notifications"),
        (name = "geocoding", description = "Place search and reverse lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
