//! Balances, ledger history, leaderboard and redemption.
//!
//! Balances are always derived from the complete ledger; the capped history
//! view is never used to compute them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::Page;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    LeaderboardFilter, LeaderboardRequest, RECENT_TRANSACTIONS_MAX, RedeemRequest, RedeemResponse,
    RewardLedgerRepository, RewardLedgerRepositoryError, RewardsCommand, RewardsQuery,
};
use crate::domain::search::normalise_search;
use crate::domain::{
    Error, LeaderboardEntry, RewardTransaction, RewardTransactionDraft, TransactionKind, UserId,
    compute_balance,
};

const DEFAULT_REDEEM_DESCRIPTION: &str = "Points redeemed";

/// Implements [`RewardsQuery`] and [`RewardsCommand`].
#[derive(Clone)]
pub struct RewardsService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> RewardsService<L> {
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

fn map_ledger_error(error: RewardLedgerRepositoryError) -> Error {
    match error {
        RewardLedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reward ledger unavailable: {message}"))
        }
        RewardLedgerRepositoryError::Query { message } => {
            Error::internal(format!("reward ledger error: {message}"))
        }
        RewardLedgerRepositoryError::InsufficientBalance { available } => {
            Error::conflict("insufficient balance").with_details(json!({
                "code": "insufficient_balance",
                "available": available,
            }))
        }
    }
}

impl<L> RewardsService<L>
where
    L: RewardLedgerRepository,
{
    async fn current_balance(&self, user_id: &UserId) -> Result<u64, Error> {
        let history = self
            .ledger
            .list_for_user(user_id)
            .await
            .map_err(map_ledger_error)?;
        Ok(compute_balance(&history))
    }
}

#[async_trait]
impl<L> RewardsQuery for RewardsService<L>
where
    L: RewardLedgerRepository,
{
    async fn balance(&self, user_id: &UserId) -> Result<u64, Error> {
        self.current_balance(user_id).await
    }

    async fn recent_transactions(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<RewardTransaction>, Error> {
        let limit = limit.clamp(1, RECENT_TRANSACTIONS_MAX);
        self.ledger
            .list_recent_for_user(user_id, i64::from(limit))
            .await
            .map_err(map_ledger_error)
    }

    async fn leaderboard(
        &self,
        request: LeaderboardRequest,
    ) -> Result<Page<LeaderboardEntry>, Error> {
        let filter = LeaderboardFilter {
            search: normalise_search(request.search),
            user: request.only_user,
        };
        self.ledger
            .leaderboard(request.page, filter)
            .await
            .map_err(map_ledger_error)
    }
}

#[async_trait]
impl<L> RewardsCommand for RewardsService<L>
where
    L: RewardLedgerRepository,
{
    async fn redeem(&self, request: RedeemRequest) -> Result<RedeemResponse, Error> {
        let RedeemRequest {
            user_id,
            amount,
            description,
        } = request;
        let description = if description.trim().is_empty() {
            DEFAULT_REDEEM_DESCRIPTION.to_owned()
        } else {
            description
        };

        let debit = RewardTransaction::new(RewardTransactionDraft {
            id: Uuid::new_v4(),
            user_id: user_id.clone(),
            kind: TransactionKind::SpentRedeem,
            amount,
            description,
            task_id: None,
            created_at: self.clock.utc(),
        })
        .map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "amount",
                "value": amount,
                "code": "must_be_positive",
            }))
        })?;

        self.ledger.redeem(&debit).await.map_err(map_ledger_error)?;
        info!(user_id = %user_id, amount, "points redeemed");

        let balance = self.current_balance(&user_id).await?;
        Ok(RedeemResponse {
            transaction: debit,
            balance,
        })
    }
}

#[cfg(test)]
#[path = "rewards_service_tests.rs"]
mod tests;
