//! Driving port for balances, history and the leaderboard.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, LeaderboardEntry, RewardTransaction, UserId};

/// Default and maximum number of history rows returned.
pub const RECENT_TRANSACTIONS_LIMIT: u32 = 10;
pub const RECENT_TRANSACTIONS_MAX: u32 = 50;
/// Default page size of the leaderboard.
pub const LEADERBOARD_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRequest {
    pub page: PageRequest,
    /// Case-insensitive display-name filter.
    pub search: Option<String>,
    /// Restrict the page to this contributor, keeping their overall rank.
    pub only_user: Option<UserId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardsQuery: Send + Sync {
    /// Current balance derived from the full ledger.
    async fn balance(&self, user_id: &UserId) -> Result<u64, Error>;

    /// Newest ledger rows first.
    async fn recent_transactions(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<RewardTransaction>, Error>;

    async fn leaderboard(
        &self,
        request: LeaderboardRequest,
    ) -> Result<Page<LeaderboardEntry>, Error>;
}
