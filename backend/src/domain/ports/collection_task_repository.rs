//! Driven port for collection tasks.
//!
//! State changes are expressed as conditional writes. `claim` only succeeds
//! against a `pending` row and `complete_verification` only against a row
//! still awaiting verification by the same collector, so two concurrent
//! callers can never both win.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::{
    CollectionTask, Notification, RewardTransaction, UserId, VerificationResult,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by collection task adapters.
    pub enum CollectionTaskRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "task repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task repository query failed: {message}",
    }
}

/// Rows written when a collection passes verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedCollection {
    pub task_id: Uuid,
    pub collector: UserId,
    pub verification: VerificationResult,
    pub reward: RewardTransaction,
    pub notification: Notification,
    pub collected_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionTaskRepository: Send + Sync {
    /// Fetch one task.
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError>;

    /// Page through tasks, newest first, optionally filtered by a
    /// case-insensitive substring of the location.
    async fn list(
        &self,
        request: PageRequest,
        search: Option<String>,
    ) -> Result<Page<CollectionTask>, CollectionTaskRepositoryError>;

    /// Move a `pending` task to `in_progress` for `collector`.
    ///
    /// Returns `None` when the row was not pending at write time.
    async fn claim(
        &self,
        id: Uuid,
        collector: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError>;

    /// Mark the task verified and record the collection, reward and
    /// notification in one transaction.
    ///
    /// Returns `None` when the task was no longer awaiting verification by
    /// the collector at write time; nothing is written in that case.
    async fn complete_verification(
        &self,
        collection: &VerifiedCollection,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError>;

    /// Reward already issued for a task, if any.
    async fn find_reward_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Option<RewardTransaction>, CollectionTaskRepositoryError>;
}
