//! PostgreSQL-backed `ReportRepository`.
//!
//! A submission inserts the report, its task, the reporter's reward and the
//! notification inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::Report;
use crate::domain::ports::{ReportRepository, ReportRepositoryError, ReportSubmission};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewReportRow, ReportRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{new_notification_row, new_reward_row, new_task_row, report_from_row};
use super::schema::{collection_tasks, notifications, reports, reward_transactions};

/// Diesel-backed implementation of the `ReportRepository` port.
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReportRepositoryError {
    map_basic_pool_error(error, ReportRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReportRepositoryError {
    map_basic_diesel_error(
        error,
        ReportRepositoryError::query,
        ReportRepositoryError::connection,
    )
}

fn new_report_row(report: &Report) -> Result<NewReportRow<'_>, ReportRepositoryError> {
    let verification = report
        .verification()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| ReportRepositoryError::query(format!("serialise verification: {err}")))?;
    Ok(NewReportRow {
        id: report.id(),
        user_id: *report.user_id().as_uuid(),
        location: report.location().as_ref(),
        waste_type: report.waste_type().as_ref(),
        amount: report.amount().as_ref(),
        has_image: report.has_image(),
        verification,
        created_at: report.created_at(),
    })
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn submit(&self, submission: &ReportSubmission) -> Result<(), ReportRepositoryError> {
        let report_row = new_report_row(&submission.report)?;
        let task_row = new_task_row(&submission.task);
        let reward_row =
            new_reward_row(&submission.reward).map_err(ReportRepositoryError::query)?;
        let notification_row = new_notification_row(&submission.notification);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(reports::table)
                    .values(&report_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(collection_tasks::table)
                    .values(&task_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(reward_transactions::table)
                    .values(&reward_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(notifications::table)
                    .values(&notification_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Report>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ReportRow> = reports::table
            .select(ReportRow::as_select())
            .order((reports::created_at.desc(), reports::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| report_from_row(row).map_err(ReportRepositoryError::query))
            .collect()
    }
}
