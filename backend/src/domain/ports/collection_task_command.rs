//! Driving port for claiming and verifying collection tasks.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    CollectionTask, Error, RewardTransaction, UserId, VerificationResult, WasteImage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTaskRequest {
    pub task_id: Uuid,
    pub collector: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifyTaskRequest {
    pub task_id: Uuid,
    pub collector: UserId,
    pub image: WasteImage,
}

/// Result of a verification attempt.
///
/// A rejected photo is an ordinary outcome, not an error: the task stays
/// where it was and nothing is written.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyTaskResponse {
    Verified {
        task: CollectionTask,
        verification: Option<VerificationResult>,
        reward: RewardTransaction,
    },
    Rejected {
        task: CollectionTask,
        verification: VerificationResult,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionTaskCommand: Send + Sync {
    /// Take a pending task. Repeating the call as the holder is a no-op.
    async fn claim_task(&self, request: ClaimTaskRequest) -> Result<CollectionTask, Error>;

    /// Check a collection photo and, when it passes, reward the collector.
    ///
    /// Repeating the call after success returns the original reward.
    async fn verify_task(&self, request: VerifyTaskRequest) -> Result<VerifyTaskResponse, Error>;
}
