//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they can be tested against mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CollectionTaskCommand, CollectionTaskQuery, GeocodingQuery, ImpactQuery,
    NotificationsCommand, ReportCommand, ReportQuery, RewardsCommand, RewardsQuery, UserOnboarding,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub onboarding: Arc<dyn UserOnboarding>,
    pub reports: Arc<dyn ReportCommand>,
    pub reports_query: Arc<dyn ReportQuery>,
    pub impact: Arc<dyn ImpactQuery>,
    pub tasks: Arc<dyn CollectionTaskCommand>,
    pub tasks_query: Arc<dyn CollectionTaskQuery>,
    pub rewards: Arc<dyn RewardsCommand>,
    pub rewards_query: Arc<dyn RewardsQuery>,
    pub notifications: Arc<dyn NotificationsCommand>,
    pub geocoding: Arc<dyn GeocodingQuery>,
}
