//! Driven port for the reward ledger.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{LeaderboardEntry, RewardTransaction, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by reward ledger adapters.
    pub enum RewardLedgerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "reward ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "reward ledger query failed: {message}",
        /// The debit exceeds the balance at write time.
        InsufficientBalance { available: u64 } => "insufficient balance: {available} available",
    }
}

/// Narrows which leaderboard rows are returned without changing their rank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardFilter {
    /// Case-insensitive substring of the display name.
    pub search: Option<String>,
    /// Only this contributor's row.
    pub user: Option<UserId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardLedgerRepository: Send + Sync {
    /// Every ledger row for a user, oldest first.
    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError>;

    /// The newest `limit` rows for a user, newest first.
    async fn list_recent_for_user(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<RewardTransaction>, RewardLedgerRepositoryError>;

    /// Append a debit after checking the balance under a per-user lock.
    async fn redeem(&self, debit: &RewardTransaction) -> Result<(), RewardLedgerRepositoryError>;

    /// Contributors ranked by total earned points. Ranks are computed over
    /// every contributor before `filter` is applied.
    async fn leaderboard(
        &self,
        request: PageRequest,
        filter: LeaderboardFilter,
    ) -> Result<Page<LeaderboardEntry>, RewardLedgerRepositoryError>;
}
