//! Driven port for community-wide aggregates.
use async_trait::async_trait;

use crate::domain::ImpactTotals;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by impact adapters.
    pub enum ImpactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "impact repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "impact repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImpactRepository: Send + Sync {
    /// Totals across every report, collection task and earned ledger row.
    async fn totals(&self) -> Result<ImpactTotals, ImpactRepositoryError>;
}
