//! Report classification and submission.
//!
//! Submission is a command: the service validates the request, builds every
//! row the report implies and hands them to the repository as one
//! [`ReportSubmission`]. Nothing is written for a report whose photo was not
//! successfully classified.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    ClassifyImageRequest, RECENT_REPORTS_MAX, ReportCommand, ReportQuery, ReportRepository,
    ReportRepositoryError, ReportSubmission, SubmitReportRequest, SubmitReportResponse,
    WasteClassifier, WasteClassifierError,
};
use crate::domain::{
    CollectionTask, Error, Notification, NotificationKind, Report, ReportDraft, RewardPolicy,
    RewardTransaction, RewardTransactionDraft, TransactionKind, WasteClassification,
    ensure_submittable, report_reward_message,
};

const REPORT_REWARD_DESCRIPTION: &str = "Points earned for reporting waste";

/// Implements [`ReportCommand`] and [`ReportQuery`].
#[derive(Clone)]
pub struct ReportService<R, C> {
    reports: Arc<R>,
    classifier: Arc<C>,
    rewards: Arc<dyn RewardPolicy>,
    clock: Arc<dyn Clock>,
}

impl<R, C> ReportService<R, C> {
    pub fn new(
        reports: Arc<R>,
        classifier: Arc<C>,
        rewards: Arc<dyn RewardPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reports,
            classifier,
            rewards,
            clock,
        }
    }
}

fn map_report_error(error: ReportRepositoryError) -> Error {
    match error {
        ReportRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("report repository unavailable: {message}"))
        }
        ReportRepositoryError::Query { message } => {
            Error::internal(format!("report repository error: {message}"))
        }
    }
}

/// Map classifier failures onto the public error taxonomy.
///
/// An unreachable model is retryable (`503`); an unreadable answer is the
/// model's fault (`502`).
pub(crate) fn map_classifier_error(error: WasteClassifierError) -> Error {
    let kind = error.kind();
    match error {
        WasteClassifierError::Transport { message }
        | WasteClassifierError::Timeout { message }
        | WasteClassifierError::RateLimited { message } => {
            Error::service_unavailable(format!("classifier unavailable: {message}"))
                .with_details(json!({ "reason": kind }))
        }
        WasteClassifierError::Decode { message } => {
            Error::bad_gateway(format!("classifier returned an unreadable answer: {message}"))
        }
        WasteClassifierError::InvalidRequest { message } => {
            Error::invalid_request(format!("classifier rejected the image: {message}"))
        }
    }
}

impl<R, C> ReportService<R, C> {
    fn build_submission(
        &self,
        request: SubmitReportRequest,
    ) -> Result<(ReportSubmission, u32), Error> {
        let SubmitReportRequest {
            user_id,
            location,
            waste_type,
            amount,
            verification_status: _,
            classification,
            image,
        } = request;
        let now = self.clock.utc();

        let report = Report::new(ReportDraft {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            location,
            waste_type,
            amount,
            has_image: image.is_some(),
            verification: classification,
            created_at: now,
        });

        let task = CollectionTask::open(
            Uuid::new_v4(),
            Some(report.id()),
            report.location().clone(),
            report.waste_type().clone(),
            report.amount().clone(),
            now,
        );

        let points = self.rewards.report_reward();
        let reward = RewardTransaction::new(RewardTransactionDraft {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            kind: TransactionKind::EarnedReport,
            amount: points,
            description: REPORT_REWARD_DESCRIPTION.to_owned(),
            task_id: None,
            created_at: now,
        })
        .map_err(|err| Error::internal(format!("invalid report reward: {err}")))?;

        let notification = Notification::unread(
            Uuid::new_v4(),
            user_id,
            NotificationKind::Reward,
            report_reward_message(points),
            now,
        );

        Ok((
            ReportSubmission {
                report,
                task,
                reward,
                notification,
            },
            points,
        ))
    }
}

#[async_trait]
impl<R, C> ReportCommand for ReportService<R, C>
where
    R: ReportRepository,
    C: WasteClassifier,
{
    async fn classify_image(
        &self,
        request: ClassifyImageRequest,
    ) -> Result<WasteClassification, Error> {
        self.classifier
            .classify(&request.image)
            .await
            .map_err(map_classifier_error)
    }

    async fn submit_report(
        &self,
        request: SubmitReportRequest,
    ) -> Result<SubmitReportResponse, Error> {
        ensure_submittable(request.verification_status).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "verificationStatus",
                "value": request.verification_status.as_str(),
                "code": "not_verified",
            }))
        })?;

        let (submission, reward_points) = self.build_submission(request)?;
        self.reports
            .submit(&submission)
            .await
            .map_err(map_report_error)?;
        info!(
            report_id = %submission.report.id(),
            task_id = %submission.task.id(),
            user_id = %submission.report.user_id(),
            "report submitted"
        );

        let ReportSubmission { report, task, .. } = submission;
        Ok(SubmitReportResponse {
            report,
            task,
            reward_points,
        })
    }
}

#[async_trait]
impl<R, C> ReportQuery for ReportService<R, C>
where
    R: ReportRepository,
    C: WasteClassifier,
{
    async fn recent_reports(&self, limit: u32) -> Result<Vec<Report>, Error> {
        let limit = limit.clamp(1, RECENT_REPORTS_MAX);
        self.reports
            .list_recent(i64::from(limit))
            .await
            .map_err(map_report_error)
    }
}

#[cfg(test)]
#[path = "report_service_tests.rs"]
mod tests;
