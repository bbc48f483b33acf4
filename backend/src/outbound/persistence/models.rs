//! Internal Diesel row structs.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Each repository owns the conversion from
//! its rows to validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Uuid as SqlUuid, Varchar};
use uuid::Uuid;

use super::schema::{
    collected_wastes, collection_tasks, notifications, reports, reward_transactions, users,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub display_name: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location: String,
    pub waste_type: String,
    pub amount: String,
    pub has_image: bool,
    pub verification: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reports)]
pub(crate) struct NewReportRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location: &'a str,
    pub waste_type: &'a str,
    pub amount: &'a str,
    pub has_image: bool,
    pub verification: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collection_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollectionTaskRow {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub location: String,
    pub waste_type: String,
    pub amount: String,
    pub status: String,
    pub collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collection_tasks)]
pub(crate) struct NewCollectionTaskRow<'a> {
    pub id: Uuid,
    pub report_id: Option<Uuid>,
    pub location: &'a str,
    pub waste_type: &'a str,
    pub amount: &'a str,
    pub status: &'a str,
    pub collector_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collected_wastes)]
pub(crate) struct NewCollectedWasteRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub collector_id: Uuid,
    pub verification: serde_json::Value,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reward_transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RewardTransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: i32,
    pub description: String,
    pub task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reward_transactions)]
pub(crate) struct NewRewardTransactionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub amount: i32,
    pub description: &'a str,
    pub task_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub message: &'a str,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// One leaderboard line produced by the ranking query.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct LeaderboardRow {
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Varchar)]
    pub display_name: String,
    #[diesel(sql_type = BigInt)]
    pub points: i64,
    /// Position over the whole board, before any filter.
    #[diesel(sql_type = BigInt)]
    pub rank: i64,
}

/// Row count produced by an aggregate query.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = BigInt)]
    pub total: i64,
}

/// Community totals produced by the impact query.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct ImpactRow {
    #[diesel(sql_type = Double)]
    pub waste_collected: f64,
    #[diesel(sql_type = BigInt)]
    pub reports_submitted: i64,
    #[diesel(sql_type = BigInt)]
    pub tokens_earned: i64,
}
