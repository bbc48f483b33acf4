//! Landing-page impact summary.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ImpactQuery, ImpactRepository, ImpactRepositoryError};
use crate::domain::{Error, ImpactSummary};

/// Implements [`ImpactQuery`].
#[derive(Clone)]
pub struct ImpactService<R> {
    totals: Arc<R>,
}

impl<R> ImpactService<R> {
    pub fn new(totals: Arc<R>) -> Self {
        Self { totals }
    }
}

fn map_impact_error(error: ImpactRepositoryError) -> Error {
    match error {
        ImpactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("impact repository unavailable: {message}"))
        }
        ImpactRepositoryError::Query { message } => {
            Error::internal(format!("impact repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> ImpactQuery for ImpactService<R>
where
    R: ImpactRepository,
{
    async fn summary(&self) -> Result<ImpactSummary, Error> {
        self.totals
            .totals()
            .await
            .map(ImpactSummary::from)
            .map_err(map_impact_error)
    }
}
