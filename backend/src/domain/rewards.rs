//! Reward ledger, balances, leaderboard standing, and reward amounts.
//!
//! The ledger is append-only. A balance is always derived from the full
//! history: `earned*` rows credit, everything else debits, and the result
//! never drops below zero.

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DisplayName, UserId};

/// Points carried by a single ledger row.
pub type RewardPoints = u32;

/// Inclusive range a collection reward is drawn from.
pub const COLLECTION_REWARD_RANGE: RangeInclusive<RewardPoints> = 10..=59;
/// Fixed points granted for submitting a report.
pub const REPORT_REWARD: RewardPoints = 10;
/// Points needed per leaderboard level.
pub const POINTS_PER_LEVEL: u64 = 100;

const CREDIT_PREFIX: &str = "earned";

/// Ledger row category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    EarnedReport,
    EarnedCollect,
    SpentRedeem,
    /// Any other category already present in the ledger.
    Other(String),
}

impl TransactionKind {
    /// Storage and wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::EarnedReport => "earned_report",
            Self::EarnedCollect => "earned_collect",
            Self::SpentRedeem => "spent_redeem",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Whether the row adds to the balance.
    pub fn is_credit(&self) -> bool {
        self.as_str().starts_with(CREDIT_PREFIX)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TransactionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "earned_report" => Self::EarnedReport,
            "earned_collect" => Self::EarnedCollect,
            "spent_redeem" => Self::SpentRedeem,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for TransactionKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<TransactionKind> for String {
    fn from(value: TransactionKind) -> Self {
        match value {
            TransactionKind::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

/// Validation errors for ledger rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardValidationError {
    ZeroAmount,
    EmptyDescription,
}

impl fmt::Display for RewardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "reward amount must be positive"),
            Self::EmptyDescription => write!(f, "reward description must not be empty"),
        }
    }
}

impl std::error::Error for RewardValidationError {}

/// Input for [`RewardTransaction::new`].
#[derive(Debug, Clone)]
pub struct RewardTransactionDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: u32,
    pub description: String,
    pub task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTransaction {
    id: Uuid,
    user_id: UserId,
    kind: TransactionKind,
    amount: u32,
    description: String,
    task_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl RewardTransaction {
    /// Validate a ledger row.
    pub fn new(draft: RewardTransactionDraft) -> Result<Self, RewardValidationError> {
        let RewardTransactionDraft {
            id,
            user_id,
            kind,
            amount,
            description,
            task_id,
            created_at,
        } = draft;
        if amount == 0 {
            return Err(RewardValidationError::ZeroAmount);
        }
        let description = description.trim().to_owned();
        if description.is_empty() {
            return Err(RewardValidationError::EmptyDescription);
        }
        Ok(Self {
            id,
            user_id,
            kind,
            amount,
            description,
            task_id,
            created_at,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Task whose verification produced this row, for collection rewards.
    pub fn task_id(&self) -> Option<Uuid> {
        self.task_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Signed contribution of this row to the balance.
    pub fn signed_amount(&self) -> i64 {
        let amount = i64::from(self.amount);
        if self.kind.is_credit() { amount } else { -amount }
    }
}

/// Balance over a full ledger history, floored at zero.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use cleanbee::domain::{
///     RewardTransaction, RewardTransactionDraft, TransactionKind, UserId, compute_balance,
/// };
/// use uuid::Uuid;
///
/// let user = UserId::random();
/// let row = |kind: TransactionKind, amount| {
///     RewardTransaction::new(RewardTransactionDraft {
///         id: Uuid::new_v4(),
///         user_id: user.clone(),
///         kind,
///         amount,
///         description: "test".into(),
///         task_id: None,
///         created_at: Utc::now(),
///     })
///     .expect("valid row")
/// };
/// let ledger = [row(TransactionKind::EarnedReport, 20), row(TransactionKind::SpentRedeem, 5)];
/// assert_eq!(compute_balance(&ledger), 15);
/// ```
pub fn compute_balance<'a>(transactions: impl IntoIterator<Item = &'a RewardTransaction>) -> u64 {
    let total: i64 = transactions
        .into_iter()
        .map(RewardTransaction::signed_amount)
        .sum();
    u64::try_from(total).unwrap_or(0)
}

/// Level shown next to a contributor's points.
pub const fn level_for_points(points: u64) -> u32 {
    let level = 1 + points / POINTS_PER_LEVEL;
    if level > u32::MAX as u64 {
        u32::MAX
    } else {
        level as u32
    }
}

/// A contributor's leaderboard standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub user_id: UserId,
    pub user_name: DisplayName,
    pub points: u64,
    pub level: u32,
}

impl LeaderboardEntry {
    /// Build an entry, deriving the level from total earned points.
    pub fn new(rank: u64, user_id: UserId, user_name: DisplayName, points: u64) -> Self {
        Self {
            rank,
            user_id,
            user_name,
            points,
            level: level_for_points(points),
        }
    }
}

/// Decides how many points an action is worth.
#[cfg_attr(test, mockall::automock)]
pub trait RewardPolicy: Send + Sync {
    /// Points for a verified collection.
    fn collection_reward(&self) -> u32;

    /// Points for submitting a verified report.
    fn report_reward(&self) -> u32;
}

/// Draws collection rewards uniformly from [`COLLECTION_REWARD_RANGE`].
pub struct UniformRewardPolicy {
    rng: Mutex<SmallRng>,
}

impl UniformRewardPolicy {
    /// Seed from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Deterministic sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for UniformRewardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardPolicy for UniformRewardPolicy {
    fn collection_reward(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(COLLECTION_REWARD_RANGE)
    }

    fn report_reward(&self) -> u32 {
        REPORT_REWARD
    }
}
