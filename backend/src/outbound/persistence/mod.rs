//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel row structs and domain
//! types; `models.rs` and `schema.rs` never leak into the domain. Connections
//! come from a `bb8` pool through `diesel-async`, and every database failure
//! is mapped onto the owning port's error enum.
//!
//! Multi-row writes (report submission, verified collections, redemptions)
//! run inside a single transaction so the ledger never records half an
//! action.
//!
//! # Example
//!
//! ```ignore
//! use cleanbee::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cleanbee")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_collection_task_repository;
mod diesel_impact_repository;
mod diesel_notification_repository;
mod diesel_report_repository;
mod diesel_reward_ledger_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_collection_task_repository::DieselCollectionTaskRepository;
pub use diesel_impact_repository::DieselImpactRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use diesel_reward_ledger_repository::DieselRewardLedgerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
