//! Builders wiring Diesel repositories and HTTP clients into the services
//! behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use cleanbee::domain::ports::{
    CollectionTaskCommand, CollectionTaskQuery, ReportCommand, ReportQuery, RewardsCommand,
    RewardsQuery,
};
use cleanbee::domain::{
    CollectionTaskService, GeocodingService, ImpactService, NotificationService, ReportService,
    RewardPolicy, RewardsService, UniformRewardPolicy, UserOnboardingService,
};
use cleanbee::inbound::http::state::HttpState;
use cleanbee::outbound::gemini::GeminiWasteClassifier;
use cleanbee::outbound::mapbox::MapboxGeocoder;
use cleanbee::outbound::persistence::{
    DbPool, DieselCollectionTaskRepository, DieselImpactRepository, DieselNotificationRepository,
    DieselReportRepository, DieselRewardLedgerRepository, DieselUserRepository,
};

/// Outbound adapters shared by every worker.
#[derive(Clone)]
pub(crate) struct Adapters {
    pub(crate) pool: DbPool,
    pub(crate) classifier: Arc<GeminiWasteClassifier>,
    pub(crate) geocoder: Arc<MapboxGeocoder>,
}

/// Share one service between the command and query ports it implements.
fn build_service_pair<S, Cmd, Query, Cast>(service: S, cast: Cast) -> (Arc<Cmd>, Arc<Query>)
where
    Cmd: ?Sized,
    Query: ?Sized,
    Cast: FnOnce(Arc<S>) -> (Arc<Cmd>, Arc<Query>),
{
    cast(Arc::new(service))
}

/// Build handler state with the production clock and reward policy.
pub(super) fn build_http_state(adapters: &Adapters) -> HttpState {
    build_http_state_with(
        adapters,
        Arc::new(DefaultClock),
        Arc::new(UniformRewardPolicy::new()),
    )
}

fn build_http_state_with(
    adapters: &Adapters,
    clock: Arc<dyn Clock>,
    rewards_policy: Arc<dyn RewardPolicy>,
) -> HttpState {
    let Adapters {
        pool,
        classifier,
        geocoder,
    } = adapters;

    let onboarding = Arc::new(UserOnboardingService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        clock.clone(),
    ));

    let (reports, reports_query) = build_service_pair(
        ReportService::new(
            Arc::new(DieselReportRepository::new(pool.clone())),
            classifier.clone(),
            rewards_policy.clone(),
            clock.clone(),
        ),
        |service| {
            (
                service.clone() as Arc<dyn ReportCommand>,
                service as Arc<dyn ReportQuery>,
            )
        },
    );

    let (tasks, tasks_query) = build_service_pair(
        CollectionTaskService::new(
            Arc::new(DieselCollectionTaskRepository::new(pool.clone())),
            classifier.clone(),
            rewards_policy,
            clock.clone(),
        ),
        |service| {
            (
                service.clone() as Arc<dyn CollectionTaskCommand>,
                service as Arc<dyn CollectionTaskQuery>,
            )
        },
    );

    let (rewards, rewards_query) = build_service_pair(
        RewardsService::new(
            Arc::new(DieselRewardLedgerRepository::new(pool.clone())),
            clock,
        ),
        |service| {
            (
                service.clone() as Arc<dyn RewardsCommand>,
                service as Arc<dyn RewardsQuery>,
            )
        },
    );

    HttpState {
        onboarding,
        reports,
        reports_query,
        impact: Arc::new(ImpactService::new(Arc::new(DieselImpactRepository::new(
            pool.clone(),
        )))),
        tasks,
        tasks_query,
        rewards,
        rewards_query,
        notifications: Arc::new(NotificationService::new(Arc::new(
            DieselNotificationRepository::new(pool.clone()),
        ))),
        geocoding: Arc::new(GeocodingService::new(geocoder.clone())),
    }
}
