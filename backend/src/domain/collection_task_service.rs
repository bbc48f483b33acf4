//! Claim and verification workflow for collection tasks.
//!
//! Every transition is checked twice: once in memory against the row just
//! read, to produce a precise error, and once in the repository as a
//! conditional write, so a concurrent caller that slipped in between loses
//! cleanly. When the conditional write loses, the row is re-read and the
//! outcome is decided again from what was actually persisted.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ClaimTaskRequest, CollectionTaskCommand, CollectionTaskQuery, CollectionTaskRepository,
    CollectionTaskRepositoryError, ListTasksRequest, VerifiedCollection, VerifyTaskRequest,
    VerifyTaskResponse, WasteClassifier,
};
use crate::domain::report_service::map_classifier_error;
use crate::domain::search::normalise_search;
use crate::domain::{
    ClaimOutcome, CollectionTask, Error, Notification, NotificationKind, RewardPolicy,
    RewardTransaction, RewardTransactionDraft, TaskTransitionError, TransactionKind, UserId,
    VerificationReadiness, VerificationResult, collection_reward_message,
};

const COLLECTION_REWARD_DESCRIPTION: &str = "Points earned for collecting waste";

/// Implements [`CollectionTaskCommand`] and [`CollectionTaskQuery`].
#[derive(Clone)]
pub struct CollectionTaskService<T, C> {
    tasks: Arc<T>,
    classifier: Arc<C>,
    rewards: Arc<dyn RewardPolicy>,
    clock: Arc<dyn Clock>,
}

impl<T, C> CollectionTaskService<T, C> {
    pub fn new(
        tasks: Arc<T>,
        classifier: Arc<C>,
        rewards: Arc<dyn RewardPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tasks,
            classifier,
            rewards,
            clock,
        }
    }
}

fn map_task_error(error: CollectionTaskRepositoryError) -> Error {
    match error {
        CollectionTaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task repository unavailable: {message}"))
        }
        CollectionTaskRepositoryError::Query { message } => {
            Error::internal(format!("task repository error: {message}"))
        }
    }
}

fn map_transition_error(error: TaskTransitionError) -> Error {
    let message = error.to_string();
    match error {
        TaskTransitionError::NotCollector => Error::forbidden(message),
        TaskTransitionError::AlreadyClaimed => {
            Error::conflict(message).with_details(json!({ "code": "already_claimed" }))
        }
        TaskTransitionError::NotClaimable { status }
        | TaskTransitionError::NotAwaitingVerification { status } => Error::conflict(message)
            .with_details(json!({ "code": "invalid_status", "status": status.as_str() })),
    }
}

fn task_not_found(id: Uuid) -> Error {
    Error::not_found(format!("task {id} not found"))
}

impl<T, C> CollectionTaskService<T, C>
where
    T: CollectionTaskRepository,
    C: WasteClassifier,
{
    async fn load(&self, id: Uuid) -> Result<CollectionTask, Error> {
        self.tasks
            .find_by_id(id)
            .await
            .map_err(map_task_error)?
            .ok_or_else(|| task_not_found(id))
    }

    /// Decide a claim from the persisted row after a lost compare-and-set.
    async fn settle_claim(&self, id: Uuid, collector: &UserId) -> Result<CollectionTask, Error> {
        let current = self.load(id).await?;
        match current.check_claim(collector).map_err(map_transition_error)? {
            ClaimOutcome::AlreadyHeld => Ok(current),
            ClaimOutcome::Claimable => Err(Error::conflict("task changed while claiming")),
        }
    }

    /// Return the reward already issued for a verified task.
    async fn replay_verification(
        &self,
        task: CollectionTask,
        collector: &UserId,
    ) -> Result<VerifyTaskResponse, Error> {
        let reward = self
            .tasks
            .find_reward_for_task(task.id())
            .await
            .map_err(map_task_error)?
            .ok_or_else(|| Error::internal("verified task has no reward"))?;
        if reward.user_id() != collector {
            return Err(Error::internal("verified task rewarded another collector"));
        }
        info!(task_id = %task.id(), "replayed verification");
        Ok(VerifyTaskResponse::Verified {
            task,
            verification: None,
            reward,
        })
    }

    fn build_collection(
        &self,
        task: &CollectionTask,
        collector: &UserId,
        verification: VerificationResult,
    ) -> Result<VerifiedCollection, Error> {
        let now = self.clock.utc();
        let points = self.rewards.collection_reward();
        let reward = RewardTransaction::new(RewardTransactionDraft {
            id: Uuid::new_v4(),
            user_id: collector.clone(),
            kind: TransactionKind::EarnedCollect,
            amount: points,
            description: COLLECTION_REWARD_DESCRIPTION.to_owned(),
            task_id: Some(task.id()),
            created_at: now,
        })
        .map_err(|err| Error::internal(format!("invalid collection reward: {err}")))?;
        let notification = Notification::unread(
            Uuid::new_v4(),
            collector.clone(),
            NotificationKind::Reward,
            collection_reward_message(points),
            now,
        );
        Ok(VerifiedCollection {
            task_id: task.id(),
            collector: collector.clone(),
            verification,
            reward,
            notification,
            collected_at: now,
        })
    }
}

#[async_trait]
impl<T, C> CollectionTaskCommand for CollectionTaskService<T, C>
where
    T: CollectionTaskRepository,
    C: WasteClassifier,
{
    async fn claim_task(&self, request: ClaimTaskRequest) -> Result<CollectionTask, Error> {
        let ClaimTaskRequest { task_id, collector } = request;
        let task = self.load(task_id).await?;

        match task.check_claim(&collector).map_err(map_transition_error)? {
            ClaimOutcome::AlreadyHeld => Ok(task),
            ClaimOutcome::Claimable => {
                let claimed = self
                    .tasks
                    .claim(task_id, &collector, self.clock.utc())
                    .await
                    .map_err(map_task_error)?;
                match claimed {
                    Some(claimed) => {
                        info!(task_id = %task_id, collector = %collector, "task claimed");
                        Ok(claimed)
                    }
                    None => {
                        warn!(task_id = %task_id, "claim lost a concurrent update");
                        self.settle_claim(task_id, &collector).await
                    }
                }
            }
        }
    }

    async fn verify_task(&self, request: VerifyTaskRequest) -> Result<VerifyTaskResponse, Error> {
        let VerifyTaskRequest {
            task_id,
            collector,
            image,
        } = request;
        let task = self.load(task_id).await?;

        match task
            .check_verification(&collector)
            .map_err(map_transition_error)?
        {
            VerificationReadiness::AlreadyVerified => {
                return self.replay_verification(task, &collector).await;
            }
            VerificationReadiness::Awaiting => {}
        }

        let verification = self
            .classifier
            .verify(&image, task.waste_type(), task.amount())
            .await
            .map_err(map_classifier_error)?;
        if !verification.passes() {
            info!(
                task_id = %task_id,
                waste_type_match = verification.waste_type_match,
                quantity_match = verification.quantity_match,
                confidence = verification.confidence.value(),
                "verification rejected"
            );
            return Ok(VerifyTaskResponse::Rejected { task, verification });
        }

        let collection = self.build_collection(&task, &collector, verification)?;
        let completed = self
            .tasks
            .complete_verification(&collection)
            .await
            .map_err(map_task_error)?;
        match completed {
            Some(verified) => {
                info!(
                    task_id = %task_id,
                    collector = %collector,
                    points = collection.reward.amount(),
                    "task verified and rewarded"
                );
                Ok(VerifyTaskResponse::Verified {
                    task: verified,
                    verification: Some(verification),
                    reward: collection.reward,
                })
            }
            None => {
                warn!(task_id = %task_id, "verification lost a concurrent update");
                let current = self.load(task_id).await?;
                match current
                    .check_verification(&collector)
                    .map_err(map_transition_error)?
                {
                    VerificationReadiness::AlreadyVerified => {
                        self.replay_verification(current, &collector).await
                    }
                    VerificationReadiness::Awaiting => {
                        Err(Error::conflict("task changed while verifying"))
                    }
                }
            }
        }
    }
}

#[async_trait]
impl<T, C> CollectionTaskQuery for CollectionTaskService<T, C>
where
    T: CollectionTaskRepository,
    C: WasteClassifier,
{
    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Page<CollectionTask>, Error> {
        self.tasks
            .list(request.page, normalise_search(request.search))
            .await
            .map_err(map_task_error)
    }
}

#[cfg(test)]
#[path = "collection_task_service_tests.rs"]
mod tests;
