//! Driven port for storing reports.
//!
//! A submission writes four rows: the report, its collection task, the
//! reporter's reward and the reward notification. Adapters must commit them
//! together or not at all.

use async_trait::async_trait;

use crate::domain::{CollectionTask, Notification, Report, RewardTransaction};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by report repository adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "report repository query failed: {message}",
    }
}

/// Everything written when a report is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSubmission {
    pub report: Report,
    pub task: CollectionTask,
    pub reward: RewardTransaction,
    pub notification: Notification,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a submission atomically.
    async fn submit(&self, submission: &ReportSubmission) -> Result<(), ReportRepositoryError>;

    /// Most recent reports, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Report>, ReportRepositoryError>;
}
