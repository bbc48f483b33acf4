//! Report handlers: photo classification, submission and the recent feed.
//!
//! ```text
//! POST /api/v1/reports/classify {"image":{"mimeType":"image/jpeg","data":"..."}}
//! POST /api/v1/reports {"location":"...","type":"plastic","amount":"2 kg",
//!     "verificationStatus":"success"}
//! GET /api/v1/reports/recent?limit=10
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ClassifyImageRequest, RECENT_REPORTS_LIMIT, RECENT_REPORTS_MAX, SubmitReportRequest,
    SubmitReportResponse,
};
use crate::domain::{
    Confidence, Error, Location, UserId, VerificationStatus, WasteAmount, WasteClassification,
    WasteType, WasteValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ClassificationDto, ImagePayload, ReportDto, TaskDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    AMOUNT, ErrorCode, FieldName, LIMIT, LOCATION, VERIFICATION_STATUS, WASTE_TYPE, field_error,
    report_error, waste_error,
};

const VERIFICATION: FieldName = FieldName::new("verification");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyBody {
    pub image: ImagePayload,
}

/// Report submission body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportBody {
    #[schema(example = "12 Harbour Road")]
    pub location: String,
    #[serde(rename = "type")]
    #[schema(example = "plastic")]
    pub waste_type: String,
    #[schema(example = "2 kg")]
    pub amount: String,
    /// Must be `success`; other states are rejected before anything is stored.
    #[schema(example = "success")]
    pub verification_status: String,
    pub verification: Option<ClassificationDto>,
    pub image: Option<ImagePayload>,
}

impl SubmitReportBody {
    fn into_request(self, user_id: UserId) -> Result<SubmitReportRequest, Error> {
        let verification_status = self
            .verification_status
            .parse::<VerificationStatus>()
            .map_err(|err| report_error(VERIFICATION_STATUS, &err))?;
        let location = Location::new(self.location).map_err(|err| waste_error(LOCATION, &err))?;
        let waste_type =
            WasteType::new(self.waste_type).map_err(|err| waste_error(WASTE_TYPE, &err))?;
        let amount = WasteAmount::new(self.amount).map_err(|err| waste_error(AMOUNT, &err))?;
        let classification = self.verification.map(parse_classification).transpose()?;
        let image = self.image.map(ImagePayload::into_domain).transpose()?;
        Ok(SubmitReportRequest {
            user_id,
            location,
            waste_type,
            amount,
            verification_status,
            classification,
            image,
        })
    }
}

fn parse_classification(dto: ClassificationDto) -> Result<WasteClassification, Error> {
    let invalid = |err: WasteValidationError| waste_error(VERIFICATION, &err);
    Ok(WasteClassification {
        waste_type: WasteType::new(dto.waste_type).map_err(invalid)?,
        quantity: WasteAmount::new(dto.quantity).map_err(invalid)?,
        confidence: Confidence::new(dto.confidence).map_err(invalid)?,
    })
}

/// Rows created by an accepted report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponseDto {
    pub report: ReportDto,
    pub task: TaskDto,
    pub reward_points: u32,
}

impl From<&SubmitReportResponse> for SubmitReportResponseDto {
    fn from(response: &SubmitReportResponse) -> Self {
        Self {
            report: ReportDto::from(&response.report),
            task: TaskDto::from(&response.task),
            reward_points: response.reward_points,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RecentReportsParams {
    /// Number of reports, 1 to 50. Defaults to 10.
    pub limit: Option<u32>,
}

fn recent_limit(limit: Option<u32>) -> Result<u32, Error> {
    match limit.unwrap_or(RECENT_REPORTS_LIMIT) {
        value @ 1..=RECENT_REPORTS_MAX => Ok(value),
        _ => Err(field_error(
            LIMIT,
            ErrorCode::OutOfRange,
            format!("limit must be between 1 and {RECENT_REPORTS_MAX}"),
        )),
    }
}

/// Ask the vision model what a photo shows.
#[utoipa::path(
    post,
    path = "/api/v1/reports/classify",
    request_body = ClassifyBody,
    responses(
        (status = 200, description = "Classification", body = ClassificationDto),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 502, description = "Unusable model answer", body = ErrorSchema),
        (status = 503, description = "Model unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "classifyImage"
)]
#[post("/reports/classify")]
pub async fn classify_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ClassifyBody>,
) -> ApiResult<web::Json<ClassificationDto>> {
    session.require_user_id()?;
    let image = payload.into_inner().image.into_domain()?;
    let classification = state
        .reports
        .classify_image(ClassifyImageRequest { image })
        .await?;
    Ok(web::Json(ClassificationDto::from(&classification)))
}

/// Store a verified report, open its collection task and credit the author.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = SubmitReportBody,
    responses(
        (status = 201, description = "Report stored", body = SubmitReportResponseDto),
        (status = 400, description = "Invalid or unverified report", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "submitReport"
)]
#[post("/reports")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitReportBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = payload.into_inner().into_request(user_id)?;
    let response = state.reports.submit_report(request).await?;
    Ok(HttpResponse::Created().json(SubmitReportResponseDto::from(&response)))
}

/// Newest reports first.
#[utoipa::path(
    get,
    path = "/api/v1/reports/recent",
    params(RecentReportsParams),
    responses(
        (status = 200, description = "Recent reports", body = [ReportDto]),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "recentReports",
    security([])
)]
#[get("/reports/recent")]
pub async fn recent_reports(
    state: web::Data<HttpState>,
    params: web::Query<RecentReportsParams>,
) -> ApiResult<web::Json<Vec<ReportDto>>> {
    let limit = recent_limit(params.limit)?;
    let reports = state.reports_query.recent_reports(limit).await?;
    Ok(web::Json(reports.iter().map(ReportDto::from).collect()))
}
