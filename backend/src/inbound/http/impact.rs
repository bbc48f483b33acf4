//! Community impact summary.
//!
//! ```text
//! GET /api/v1/impact
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ImpactSummary;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Totals shown on the landing page, rounded to one decimal place.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactDto {
    /// Sum of the leading number of every task amount.
    #[schema(example = 7.5)]
    pub waste_collected: f64,
    pub reports_submitted: u64,
    /// Points earned by everyone, before redemptions.
    pub tokens_earned: u64,
    /// Half of `wasteCollected`.
    #[schema(example = 3.8)]
    pub co2_offset: f64,
}

impl From<ImpactSummary> for ImpactDto {
    fn from(summary: ImpactSummary) -> Self {
        Self {
            waste_collected: summary.waste_collected,
            reports_submitted: summary.reports_submitted,
            tokens_earned: summary.tokens_earned,
            co2_offset: summary.co2_offset,
        }
    }
}

/// Waste collected, reports submitted, points earned and CO2 offset across
/// the whole community.
#[utoipa::path(
    get,
    path = "/api/v1/impact",
    responses(
        (status = 200, description = "Impact summary", body = ImpactDto),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "impactSummary",
    security([])
)]
#[get("/impact")]
pub async fn impact_summary(state: web::Data<HttpState>) -> ApiResult<web::Json<ImpactDto>> {
    let summary = state.impact.summary().await?;
    Ok(web::Json(ImpactDto::from(summary)))
}
