//! PostgreSQL-backed `ImpactRepository`.
//!
//! The leading-number extraction mirrors `WasteAmount::leading_quantity`:
//! the first `[0-9]+(.[0-9]+)?` run of each task amount, ignoring tasks
//! whose amount has no digits.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::RunQueryDsl;

use crate::domain::ImpactTotals;
use crate::domain::ports::{ImpactRepository, ImpactRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ImpactRow;
use super::pool::{DbPool, PoolError};

const IMPACT_SQL: &str = r"
SELECT
  (SELECT COALESCE(SUM(CAST(substring(amount FROM '[0-9]+(?:\.[0-9]+)?') AS DOUBLE PRECISION)), 0)
     FROM collection_tasks)::DOUBLE PRECISION AS waste_collected,
  (SELECT COUNT(*) FROM reports)::BIGINT AS reports_submitted,
  (SELECT COALESCE(SUM(amount), 0) FROM reward_transactions WHERE kind LIKE 'earned%')::BIGINT
     AS tokens_earned
";

/// Diesel-backed implementation of the `ImpactRepository` port.
#[derive(Clone)]
pub struct DieselImpactRepository {
    pool: DbPool,
}

impl DieselImpactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ImpactRepositoryError {
    map_basic_pool_error(error, ImpactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ImpactRepositoryError {
    map_basic_diesel_error(
        error,
        ImpactRepositoryError::query,
        ImpactRepositoryError::connection,
    )
}

fn to_totals(row: ImpactRow) -> Result<ImpactTotals, ImpactRepositoryError> {
    let count = |value: i64, what: &str| {
        u64::try_from(value).map_err(|_| ImpactRepositoryError::query(format!("negative {what}")))
    };
    Ok(ImpactTotals {
        waste_collected: row.waste_collected,
        reports_submitted: count(row.reports_submitted, "report count")?,
        tokens_earned: count(row.tokens_earned, "token total")?,
    })
}

#[async_trait]
impl ImpactRepository for DieselImpactRepository {
    async fn totals(&self) -> Result<ImpactTotals, ImpactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ImpactRow = sql_query(IMPACT_SQL)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_totals(row)
    }
}
