//! PostgreSQL-backed `CollectionTaskRepository`.
//!
//! Claims and verifications are conditional `UPDATE ... RETURNING`
//! statements. A write that matches no row means another request changed the
//! task first; the adapter reports that as `None` and leaves the decision to
//! the domain.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    CollectionTaskRepository, CollectionTaskRepositoryError, VerifiedCollection,
};
use crate::domain::{CollectionTask, RewardTransaction, TaskStatus, UserId};

use super::diesel_basic_error_mapping::{
    contains_pattern, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CollectionTaskRow, NewCollectedWasteRow, RewardTransactionRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{
    new_notification_row, new_reward_row, reward_from_row, task_from_row,
};
use super::schema::{collected_wastes, collection_tasks, notifications, reward_transactions};

const AWAITING_VERIFICATION: [&str; 2] = [
    TaskStatus::InProgress.as_str(),
    TaskStatus::Completed.as_str(),
];

/// Diesel-backed implementation of the `CollectionTaskRepository` port.
#[derive(Clone)]
pub struct DieselCollectionTaskRepository {
    pool: DbPool,
}

impl DieselCollectionTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollectionTaskRepositoryError {
    map_basic_pool_error(error, CollectionTaskRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CollectionTaskRepositoryError {
    map_basic_diesel_error(
        error,
        CollectionTaskRepositoryError::query,
        CollectionTaskRepositoryError::connection,
    )
}

fn to_task(row: CollectionTaskRow) -> Result<CollectionTask, CollectionTaskRepositoryError> {
    task_from_row(row).map_err(CollectionTaskRepositoryError::query)
}

fn to_reward(
    row: RewardTransactionRow,
) -> Result<RewardTransaction, CollectionTaskRepositoryError> {
    reward_from_row(row).map_err(CollectionTaskRepositoryError::query)
}

#[async_trait]
impl CollectionTaskRepository for DieselCollectionTaskRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        collection_tasks::table
            .find(id)
            .select(CollectionTaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_task)
            .transpose()
    }

    async fn list(
        &self,
        request: PageRequest,
        search: Option<String>,
    ) -> Result<Page<CollectionTask>, CollectionTaskRepositoryError> {
        let pattern = search.as_deref().map(contains_pattern);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = collection_tasks::table.count().into_boxed();
        let mut rows_query = collection_tasks::table
            .select(CollectionTaskRow::as_select())
            .order((
                collection_tasks::created_at.desc(),
                collection_tasks::id.desc(),
            ))
            .into_boxed();
        if let Some(pattern) = pattern {
            count_query = count_query.filter(collection_tasks::location.ilike(pattern.clone()));
            rows_query = rows_query.filter(collection_tasks::location.ilike(pattern));
        }

        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<CollectionTaskRow> = rows_query
            .limit(request.limit())
            .offset(request.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let tasks = rows
            .into_iter()
            .map(to_task)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(total)
            .map_err(|_| CollectionTaskRepositoryError::query("negative task count"))?;
        Ok(Page::new(tasks, request, total))
    }

    async fn claim(
        &self,
        id: Uuid,
        collector: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            collection_tasks::table
                .filter(collection_tasks::id.eq(id))
                .filter(collection_tasks::status.eq(TaskStatus::Pending.as_str())),
        )
        .set((
            collection_tasks::status.eq(TaskStatus::InProgress.as_str()),
            collection_tasks::collector_id.eq(Some(*collector.as_uuid())),
            collection_tasks::updated_at.eq(now),
        ))
        .returning(CollectionTaskRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(to_task)
        .transpose()
    }

    async fn complete_verification(
        &self,
        collection: &VerifiedCollection,
    ) -> Result<Option<CollectionTask>, CollectionTaskRepositoryError> {
        let verification = serde_json::to_value(collection.verification).map_err(|err| {
            CollectionTaskRepositoryError::query(format!("serialise verification: {err}"))
        })?;
        let collected_row = NewCollectedWasteRow {
            id: Uuid::new_v4(),
            task_id: collection.task_id,
            collector_id: *collection.collector.as_uuid(),
            verification,
            collected_at: collection.collected_at,
        };
        let reward_row =
            new_reward_row(&collection.reward).map_err(CollectionTaskRepositoryError::query)?;
        let notification_row = new_notification_row(&collection.notification);
        let task_id = collection.task_id;
        let collector_id = *collection.collector.as_uuid();
        let now = collection.collected_at;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let updated: Option<CollectionTaskRow> = diesel::update(
                        collection_tasks::table
                            .filter(collection_tasks::id.eq(task_id))
                            .filter(collection_tasks::collector_id.eq(collector_id))
                            .filter(collection_tasks::status.eq_any(AWAITING_VERIFICATION)),
                    )
                    .set((
                        collection_tasks::status.eq(TaskStatus::Verified.as_str()),
                        collection_tasks::updated_at.eq(now),
                    ))
                    .returning(CollectionTaskRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let Some(updated) = updated else {
                        return Ok::<_, diesel::result::Error>(None);
                    };
                    diesel::insert_into(collected_wastes::table)
                        .values(&collected_row)
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
                    Ok(Some(updated))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row.map(to_task).transpose()
    }

    async fn find_reward_for_task(
        &self,
        task_id: Uuid,
    ) -> Result<Option<RewardTransaction>, CollectionTaskRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reward_transactions::table
            .filter(reward_transactions::task_id.eq(task_id))
            .select(RewardTransactionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_reward)
            .transpose()
    }
}
