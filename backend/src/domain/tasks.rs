//! Collection tasks and their state machine.
//!
//! ```text
//! pending ──claim──▶ in_progress ──verify──▶ verified
//!                         │                     ▲
//!                         └──▶ completed ───────┘
//! ```
//!
//! Nothing moves a task back to `pending`, and `verified` is terminal.
//! `completed` is accepted from storage and treated as awaiting
//! verification; no operation here produces it.
//!
//! The pure transition checks live here. Repositories repeat them as
//! conditional updates so concurrent callers cannot both win.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Location, UserId, WasteAmount, WasteType};

/// Lifecycle state of a collection task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Verified,
}

impl TaskStatus {
    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Verified => "verified",
        }
    }

    /// Whether a collector is attached in this state.
    pub const fn has_collector(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether a verification attempt may move the task forward.
    pub const fn awaits_verification(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status text read from storage or a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskStatus(pub String);

impl fmt::Display for UnknownTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown task status: {}", self.0)
    }
}

impl std::error::Error for UnknownTaskStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "verified" => Ok(Self::Verified),
            other => Err(UnknownTaskStatus(other.to_owned())),
        }
    }
}

/// Errors raised when constructing a task from inconsistent parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    CollectorWithoutClaim,
    ClaimWithoutCollector { status: TaskStatus },
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollectorWithoutClaim => write!(f, "pending tasks must not have a collector"),
            Self::ClaimWithoutCollector { status } => {
                write!(f, "tasks in status {status} must have a collector")
            }
        }
    }
}

impl std::error::Error for TaskValidationError {}

/// Rejected state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTransitionError {
    /// Another collector holds the task.
    AlreadyClaimed,
    /// The task is past the claimable stage.
    NotClaimable { status: TaskStatus },
    /// Only the collector may verify a task.
    NotCollector,
    /// The task has not been claimed yet.
    NotAwaitingVerification { status: TaskStatus },
}

impl fmt::Display for TaskTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyClaimed => write!(f, "task is already claimed by another collector"),
            Self::NotClaimable { status } => write!(f, "task cannot be claimed in status {status}"),
            Self::NotCollector => write!(f, "only the assigned collector may verify this task"),
            Self::NotAwaitingVerification { status } => {
                write!(f, "task cannot be verified in status {status}")
            }
        }
    }
}

impl std::error::Error for TaskTransitionError {}

/// Result of a permitted claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The task is pending and may be claimed.
    Claimable,
    /// The actor already holds the task; nothing to write.
    AlreadyHeld,
}

/// Result of a permitted verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationReadiness {
    /// The task awaits verification by the actor.
    Awaiting,
    /// The actor already verified the task; replay the stored reward.
    AlreadyVerified,
}

/// Input for [`CollectionTask::new`].
#[derive(Debug, Clone)]
pub struct CollectionTaskDraft {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub location: Location,
    pub waste_type: WasteType,
    pub amount: WasteAmount,
    pub status: TaskStatus,
    pub collector_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Waste awaiting (or past) collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTask {
    id: Uuid,
    report_id: Option<Uuid>,
    location: Location,
    waste_type: WasteType,
    amount: WasteAmount,
    status: TaskStatus,
    collector_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CollectionTask {
    /// Validate that collector presence agrees with the status.
    pub fn new(draft: CollectionTaskDraft) -> Result<Self, TaskValidationError> {
        let CollectionTaskDraft {
            id,
            report_id,
            location,
            waste_type,
            amount,
            status,
            collector_id,
            created_at,
            updated_at,
        } = draft;

        match (status.has_collector(), collector_id.is_some()) {
            (false, true) => return Err(TaskValidationError::CollectorWithoutClaim),
            (true, false) => return Err(TaskValidationError::ClaimWithoutCollector { status }),
            _ => {}
        }

        Ok(Self {
            id,
            report_id,
            location,
            waste_type,
            amount,
            status,
            collector_id,
            created_at,
            updated_at,
        })
    }

    /// Open a pending task for freshly reported waste.
    pub fn open(
        id: Uuid,
        report_id: Option<Uuid>,
        location: Location,
        waste_type: WasteType,
        amount: WasteAmount,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            report_id,
            location,
            waste_type,
            amount,
            status: TaskStatus::Pending,
            collector_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn report_id(&self) -> Option<Uuid> {
        self.report_id
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn waste_type(&self) -> &WasteType {
        &self.waste_type
    }

    pub fn amount(&self) -> &WasteAmount {
        &self.amount
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn collector_id(&self) -> Option<&UserId> {
        self.collector_id.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn is_held_by(&self, actor: &UserId) -> bool {
        self.collector_id.as_ref() == Some(actor)
    }

    /// Decide whether `actor` may claim this task.
    pub fn check_claim(&self, actor: &UserId) -> Result<ClaimOutcome, TaskTransitionError> {
        match self.status {
            TaskStatus::Pending => Ok(ClaimOutcome::Claimable),
            TaskStatus::InProgress if self.is_held_by(actor) => Ok(ClaimOutcome::AlreadyHeld),
            TaskStatus::InProgress => Err(TaskTransitionError::AlreadyClaimed),
            status => Err(TaskTransitionError::NotClaimable { status }),
        }
    }

    /// Decide whether `actor` may submit a verification for this task.
    pub fn check_verification(
        &self,
        actor: &UserId,
    ) -> Result<VerificationReadiness, TaskTransitionError> {
        if self.status == TaskStatus::Pending {
            return Err(TaskTransitionError::NotAwaitingVerification {
                status: self.status,
            });
        }
        if !self.is_held_by(actor) {
            return Err(TaskTransitionError::NotCollector);
        }
        if self.status == TaskStatus::Verified {
            Ok(VerificationReadiness::AlreadyVerified)
        } else {
            Ok(VerificationReadiness::Awaiting)
        }
    }

    /// The task after `actor` claims it.
    pub fn claimed_by(
        self,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskTransitionError> {
        match self.check_claim(&actor)? {
            ClaimOutcome::AlreadyHeld => Ok(self),
            ClaimOutcome::Claimable => Ok(Self {
                status: TaskStatus::InProgress,
                collector_id: Some(actor),
                updated_at: now,
                ..self
            }),
        }
    }

    /// The task after `actor`'s verification passed.
    pub fn verified_by(
        self,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskTransitionError> {
        match self.check_verification(actor)? {
            VerificationReadiness::AlreadyVerified => Ok(self),
            VerificationReadiness::Awaiting => Ok(Self {
                status: TaskStatus::Verified,
                updated_at: now,
                ..self
            }),
        }
    }
}
