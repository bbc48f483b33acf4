//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed entities for users, reports, collection
//! tasks, the reward ledger and notifications, plus the services that drive
//! them through ports. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`CollectionTask`] and [`TaskStatus`]: the collection state machine.
//! - [`RewardTransaction`] and [`compute_balance`]: the append-only ledger.
//! - [`ports`]: traits implemented by adapters and services.

pub mod classification;
pub mod error;
pub mod geo;
pub mod impact;
pub mod notifications;
pub mod ports;
pub mod reports;
pub mod rewards;
pub mod tasks;
pub mod trace_id;
pub mod user;
pub mod waste;

mod collection_task_service;
mod geocoding_service;
mod impact_service;
mod notification_service;
mod report_service;
mod rewards_service;
mod search;
mod user_onboarding_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::classification::{
    VERIFICATION_CONFIDENCE_THRESHOLD, VerificationResult, WasteClassification,
};
pub use self::collection_task_service::CollectionTaskService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{Coordinates, GeoValidationError, Place, PlaceQuery};
pub use self::geocoding_service::GeocodingService;
pub use self::impact::{CO2_OFFSET_PER_UNIT, ImpactSummary, ImpactTotals};
pub use self::impact_service::ImpactService;
pub use self::notifications::{
    Notification, NotificationKind, collection_reward_message, report_reward_message,
};
pub use self::notification_service::NotificationService;
pub use self::report_service::ReportService;
pub use self::reports::{
    Report, ReportDraft, ReportValidationError, VerificationStatus, ensure_submittable,
};
pub use self::rewards::{
    COLLECTION_REWARD_RANGE, LeaderboardEntry, POINTS_PER_LEVEL, REPORT_REWARD, RewardPoints,
    RewardPolicy, RewardTransaction, RewardTransactionDraft, RewardValidationError, TransactionKind,
    UniformRewardPolicy, compute_balance, level_for_points,
};
#[cfg(test)]
pub use self::rewards::MockRewardPolicy;
pub use self::rewards_service::RewardsService;
pub use self::tasks::{
    ClaimOutcome, CollectionTask, CollectionTaskDraft, TaskStatus, TaskTransitionError,
    TaskValidationError, UnknownTaskStatus, VerificationReadiness,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DisplayName, EmailAddress, User, UserId, UserValidationError, ANONYMOUS_DISPLAY_NAME,
};
pub use self::user_onboarding_service::UserOnboardingService;
pub use self::waste::{
    IMAGE_MAX_BYTES, Confidence, Location, WasteAmount, WasteImage, WasteType, WasteValidationError,
};
