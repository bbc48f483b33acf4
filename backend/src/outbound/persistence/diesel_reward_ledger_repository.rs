//! PostgreSQL-backed `RewardLedgerRepository`.
//!
//! Redemption locks the user's row before reading the ledger, so two
//! concurrent redemptions for the same user are serialised and cannot both
//! pass the balance check.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Nullable, Text, Uuid as SqlUuid};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{
    LeaderboardFilter, RewardLedgerRepository, RewardLedgerRepositoryError,
};
use crate::domain::{DisplayName, LeaderboardEntry, RewardTransaction, UserId, compute_balance};

use super::diesel_basic_error_mapping::{
    contains_pattern, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{CountRow, LeaderboardRow, RewardTransactionRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::{new_reward_row, reward_from_row};
use super::schema::{reward_transactions, users};

// Ranks are assigned over every contributor before the filters run.
const LEADERBOARD_SQL: &str = r"
WITH board AS (
    SELECT u.id AS user_id, u.display_name, SUM(t.amount)::BIGINT AS points,
           ROW_NUMBER() OVER (ORDER BY SUM(t.amount) DESC, u.id)::BIGINT AS rank
    FROM reward_transactions t
    JOIN users u ON u.id = t.user_id
    WHERE t.kind LIKE 'earned%'
    GROUP BY u.id, u.display_name
)
SELECT user_id, display_name, points, rank
FROM board
WHERE ($1::TEXT IS NULL OR display_name ILIKE $1)
  AND ($2::UUID IS NULL OR user_id = $2)
ORDER BY rank
LIMIT $3 OFFSET $4
";

const LEADERBOARD_COUNT_SQL: &str = r"
SELECT COUNT(DISTINCT u.id)::BIGINT AS total
FROM reward_transactions t
JOIN users u ON u.id = t.user_id
WHERE t.kind LIKE 'earned%'
  AND ($1::TEXT IS NULL OR u.display_name ILIKE $1)
  AND ($2::UUID IS NULL OR u.id = $2)
";

/// Diesel-backed implementation of the `RewardLedgerRepository` port.
#[derive(Clone)]
pub struct DieselRewardLedgerRepository {
    pool: DbPool,
}

impl DieselRewardLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RewardLedgerRepositoryError {
    map_basic_pool_error(error, RewardLedgerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RewardLedgerRepositoryError {
    map_basic_diesel_error(
        error,
        RewardLedgerRepositoryError::query,
        RewardLedgerRepositoryError::connection,
    )
}

fn to_rewards(
    rows: Vec<RewardTransactionRow>,
) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError> {
    rows.into_iter()
        .map(|row| reward_from_row(row).map_err(RewardLedgerRepositoryError::query))
        .collect()
}

/// Failure inside the redemption transaction.
#[derive(Debug)]
enum RedeemFailure {
    Database(diesel::result::Error),
    Rejected(RewardLedgerRepositoryError),
}

impl From<diesel::result::Error> for RedeemFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Database(error)
    }
}

impl From<RedeemFailure> for RewardLedgerRepositoryError {
    fn from(failure: RedeemFailure) -> Self {
        match failure {
            RedeemFailure::Database(error) => map_diesel_error(error),
            RedeemFailure::Rejected(error) => error,
        }
    }
}

fn to_entry(row: LeaderboardRow) -> Result<LeaderboardEntry, RewardLedgerRepositoryError> {
    let rank = u64::try_from(row.rank)
        .ok()
        .filter(|rank| *rank > 0)
        .ok_or_else(|| RewardLedgerRepositoryError::query("leaderboard rank out of range"))?;
    let points = u64::try_from(row.points)
        .map_err(|_| RewardLedgerRepositoryError::query("negative leaderboard points"))?;
    let name = DisplayName::new(row.display_name).map_err(|err| {
        RewardLedgerRepositoryError::query(format!("user {}: {err}", row.user_id))
    })?;
    Ok(LeaderboardEntry::new(
        rank,
        UserId::from_uuid(row.user_id),
        name,
        points,
    ))
}

#[async_trait]
impl RewardLedgerRepository for DieselRewardLedgerRepository {
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RewardTransactionRow> = reward_transactions::table
            .filter(reward_transactions::user_id.eq(user.as_uuid()))
            .select(RewardTransactionRow::as_select())
            .order((
                reward_transactions::created_at.asc(),
                reward_transactions::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_rewards(rows)
    }

    async fn list_recent_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RewardTransactionRow> = reward_transactions::table
            .filter(reward_transactions::user_id.eq(user.as_uuid()))
            .select(RewardTransactionRow::as_select())
            .order((
                reward_transactions::created_at.desc(),
                reward_transactions::id.desc(),
            ))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_rewards(rows)
    }

    async fn redeem(&self, debit: &RewardTransaction) -> Result<(), RewardLedgerRepositoryError> {
        let row = new_reward_row(debit).map_err(RewardLedgerRepositoryError::query)?;
        let user_id = *debit.user_id().as_uuid();
        let amount = u64::from(debit.amount());

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                users::table
                    .find(user_id)
                    .select(users::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await?;

                let history: Vec<RewardTransactionRow> = reward_transactions::table
                    .filter(reward_transactions::user_id.eq(user_id))
                    .select(RewardTransactionRow::as_select())
                    .load(conn)
                    .await?;
                let history = to_rewards(history).map_err(RedeemFailure::Rejected)?;
                let available = compute_balance(&history);
                if amount > available {
                    return Err(RedeemFailure::Rejected(
                        RewardLedgerRepositoryError::insufficient_balance(available),
                    ));
                }

                diesel::insert_into(reward_transactions::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(RewardLedgerRepositoryError::from)
    }

    async fn leaderboard(
        &self,
        request: PageRequest,
        filter: LeaderboardFilter,
    ) -> Result<Page<LeaderboardEntry>, RewardLedgerRepositoryError> {
        let pattern = filter.search.as_deref().map(contains_pattern);
        let user = filter.user.as_ref().map(UserId::as_uuid);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: CountRow = sql_query(LEADERBOARD_COUNT_SQL)
            .bind::<Nullable<Text>, _>(pattern.as_deref())
            .bind::<Nullable<SqlUuid>, _>(user)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<LeaderboardRow> = sql_query(LEADERBOARD_SQL)
            .bind::<Nullable<Text>, _>(pattern.as_deref())
            .bind::<Nullable<SqlUuid>, _>(user)
            .bind::<BigInt, _>(request.limit())
            .bind::<BigInt, _>(request.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let entries = rows
            .into_iter()
            .map(to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        let total = u64::try_from(count.total)
            .map_err(|_| RewardLedgerRepositoryError::query("negative leaderboard count"))?;
        Ok(Page::new(entries, request, total))
    }
}
