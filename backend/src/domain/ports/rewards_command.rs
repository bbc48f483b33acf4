//! Driving port for spending points.
use async_trait::async_trait;

use crate::domain::{Error, RewardTransaction, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemRequest {
    pub user_id: UserId,
    pub amount: u32,
    pub description: String,
}

/// The debit row and the balance left after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemResponse {
    pub transaction: RewardTransaction,
    pub balance: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardsCommand: Send + Sync {
    /// Debit points when the balance covers them.
    async fn redeem(&self, request: RedeemRequest) -> Result<RedeemResponse, Error>;
}
