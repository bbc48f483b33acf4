//! Driving port for the landing-page impact summary.
use async_trait::async_trait;

use crate::domain::{Error, ImpactSummary};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImpactQuery: Send + Sync {
    async fn summary(&self) -> Result<ImpactSummary, Error>;
}
