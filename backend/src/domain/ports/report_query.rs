//! Driving port for the recent-reports feed.
use async_trait::async_trait;

use crate::domain::{Error, Report};

/// Default size of the recent-reports feed.
pub const RECENT_REPORTS_LIMIT: u32 = 10;
/// Largest feed a caller may ask for.
pub const RECENT_REPORTS_MAX: u32 = 50;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportQuery: Send + Sync {
    /// Newest reports first.
    async fn recent_reports(&self, limit: u32) -> Result<Vec<Report>, Error>;
}
