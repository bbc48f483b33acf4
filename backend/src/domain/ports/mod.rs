//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`WasteClassifier`], [`Geocoder`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`UserOnboarding`]) are implemented by domain services and called by the
//! HTTP layer.

mod macros;
pub(crate) use macros::define_port_error;

mod collection_task_command;
mod collection_task_query;
mod collection_task_repository;
mod geocoder;
mod geocoding_query;
mod impact_query;
mod impact_repository;
mod notification_repository;
mod notifications_command;
mod report_command;
mod report_query;
mod report_repository;
mod reward_ledger_repository;
mod rewards_command;
mod rewards_query;
mod user_onboarding;
mod user_repository;
mod waste_classifier;

#[cfg(test)]
pub use collection_task_command::MockCollectionTaskCommand;
pub use collection_task_command::{
    ClaimTaskRequest, CollectionTaskCommand, VerifyTaskRequest, VerifyTaskResponse,
};
#[cfg(test)]
pub use collection_task_query::MockCollectionTaskQuery;
pub use collection_task_query::{CollectionTaskQuery, ListTasksRequest, TASKS_PER_PAGE};
#[cfg(test)]
pub use collection_task_repository::MockCollectionTaskRepository;
pub use collection_task_repository::{
    CollectionTaskRepository, CollectionTaskRepositoryError, VerifiedCollection,
};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{Geocoder, GeocoderError};
#[cfg(test)]
pub use geocoding_query::MockGeocodingQuery;
pub use geocoding_query::GeocodingQuery;
#[cfg(test)]
pub use impact_query::MockImpactQuery;
pub use impact_query::ImpactQuery;
#[cfg(test)]
pub use impact_repository::MockImpactRepository;
pub use impact_repository::{ImpactRepository, ImpactRepositoryError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifications_command::MockNotificationsCommand;
pub use notifications_command::NotificationsCommand;
#[cfg(test)]
pub use report_command::MockReportCommand;
pub use report_command::{
    ClassifyImageRequest, ReportCommand, SubmitReportRequest, SubmitReportResponse,
};
#[cfg(test)]
pub use report_query::MockReportQuery;
pub use report_query::{RECENT_REPORTS_LIMIT, RECENT_REPORTS_MAX, ReportQuery};
#[cfg(test)]
pub use report_repository::MockReportRepository;
pub use report_repository::{ReportRepository, ReportRepositoryError, ReportSubmission};
#[cfg(test)]
pub use reward_ledger_repository::MockRewardLedgerRepository;
pub use reward_ledger_repository::{
    LeaderboardFilter, RewardLedgerRepository, RewardLedgerRepositoryError,
};
#[cfg(test)]
pub use rewards_command::MockRewardsCommand;
pub use rewards_command::{RedeemRequest, RedeemResponse, RewardsCommand};
#[cfg(test)]
pub use rewards_query::MockRewardsQuery;
pub use rewards_query::{
    LEADERBOARD_PER_PAGE, LeaderboardRequest, RECENT_TRANSACTIONS_LIMIT,
    RECENT_TRANSACTIONS_MAX, RewardsQuery,
};
#[cfg(test)]
pub use user_onboarding::MockUserOnboarding;
pub use user_onboarding::{LoginRequest, UserOnboarding};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use waste_classifier::MockWasteClassifier;
pub use waste_classifier::{WasteClassifier, WasteClassifierError};
