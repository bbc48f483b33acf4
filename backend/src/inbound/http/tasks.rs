//! Collection task handlers.
//!
//! ```text
//! GET /api/v1/tasks?page=1&perPage=5&search=park
//! POST /api/v1/tasks/{id}/claim
//! POST /api/v1/tasks/{id}/verify {"image":{"mimeType":"image/jpeg","data":"..."}}
//! ```

use actix_web::{HttpRequest, get, post, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    ClaimTaskRequest, ListTasksRequest, TASKS_PER_PAGE, VerifyTaskRequest, VerifyTaskResponse,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{
    ImagePayload, PageDto, RewardTransactionDto, TaskDto, VerificationDto,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, pagination_error, parse_uuid};

const TASK_ID: FieldName = FieldName::new("taskId");

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TaskListParams {
    /// One-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100. Defaults to 5.
    pub per_page: Option<u32>,
    /// Case-insensitive location filter.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTaskBody {
    pub image: ImagePayload,
}

/// Whether the photo passed the verification gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerifyOutcome {
    Verified,
    Rejected,
}

/// Outcome of a verification attempt.
///
/// `reward` is present only for `verified`. A replayed verification returns
/// the original reward and may omit `verification`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTaskResponseDto {
    pub outcome: VerifyOutcome,
    pub task: TaskDto,
    pub verification: Option<VerificationDto>,
    pub reward: Option<RewardTransactionDto>,
}

impl From<&VerifyTaskResponse> for VerifyTaskResponseDto {
    fn from(response: &VerifyTaskResponse) -> Self {
        match response {
            VerifyTaskResponse::Verified {
                task,
                verification,
                reward,
            } => Self {
                outcome: VerifyOutcome::Verified,
                task: TaskDto::from(task),
                verification: verification.as_ref().map(VerificationDto::from),
                reward: Some(RewardTransactionDto::from(reward)),
            },
            VerifyTaskResponse::Rejected { task, verification } => Self {
                outcome: VerifyOutcome::Rejected,
                task: TaskDto::from(task),
                verification: Some(VerificationDto::from(verification)),
                reward: None,
            },
        }
    }
}

/// Browse collection tasks, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskListParams),
    responses(
        (status = 200, description = "Task page", body = PageDto<TaskDto>),
        (status = 400, description = "Invalid paging", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks",
    security([])
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    req: HttpRequest,
    params: web::Query<TaskListParams>,
) -> ApiResult<web::Json<PageDto<TaskDto>>> {
    let TaskListParams {
        page,
        per_page,
        search,
    } = params.into_inner();
    let page = PageRequest::from_query(page, per_page, TASKS_PER_PAGE).map_err(pagination_error)?;
    let tasks = state
        .tasks_query
        .list_tasks(ListTasksRequest { page, search })
        .await?
        .with_links(&req.full_url());
    Ok(web::Json(PageDto::from_page(&tasks, |task| TaskDto::from(task))))
}

/// Take a pending task. Repeating the call as the current holder is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/claim",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Claimed task", body = TaskDto),
        (status = 400, description = "Invalid task id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown task", body = ErrorSchema),
        (status = 409, description = "Claimed by someone else or finished", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "claimTask"
)]
#[post("/tasks/{id}/claim")]
pub async fn claim_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<TaskDto>> {
    let collector = session.require_user_id()?;
    let task_id = parse_uuid(&path.into_inner(), TASK_ID)?;
    let task = state
        .tasks
        .claim_task(ClaimTaskRequest { task_id, collector })
        .await?;
    Ok(web::Json(TaskDto::from(&task)))
}

/// Check a collection photo and reward the collector when it passes.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{id}/verify",
    params(("id" = String, Path, description = "Task id")),
    request_body = VerifyTaskBody,
    responses(
        (status = 200, description = "Verified or rejected", body = VerifyTaskResponseDto),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Task held by another collector", body = ErrorSchema),
        (status = 404, description = "Unknown task", body = ErrorSchema),
        (status = 409, description = "Task not awaiting verification", body = ErrorSchema),
        (status = 502, description = "Unusable model answer", body = ErrorSchema),
        (status = 503, description = "Model unavailable", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "verifyTask"
)]
#[post("/tasks/{id}/verify")]
pub async fn verify_task(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<VerifyTaskBody>,
) -> ApiResult<web::Json<VerifyTaskResponseDto>> {
    let collector = session.require_user_id()?;
    let task_id = parse_uuid(&path.into_inner(), TASK_ID)?;
    let image = payload.into_inner().image.into_domain()?;
    let response = state
        .tasks
        .verify_task(VerifyTaskRequest {
            task_id,
            collector,
            image,
        })
        .await?;
    Ok(web::Json(VerifyTaskResponseDto::from(&response)))
}

#[cfg(test)]
mod tests;
