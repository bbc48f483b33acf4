//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Contributor accounts, keyed by a lowercase email.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        display_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Waste reports. Rows are never updated.
    reports (id) {
        id -> Uuid,
        user_id -> Uuid,
        location -> Varchar,
        waste_type -> Varchar,
        amount -> Varchar,
        /// A photo accompanied the submission; the bytes are not stored.
        has_image -> Bool,
        /// Report-time classification as camelCase JSON.
        verification -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Collection tasks. `collector_id` is null exactly when `status` is
    /// `pending` (enforced by a check constraint).
    collection_tasks (id) {
        id -> Uuid,
        report_id -> Nullable<Uuid>,
        location -> Varchar,
        waste_type -> Varchar,
        amount -> Varchar,
        status -> Varchar,
        collector_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per verified task.
    collected_wastes (id) {
        id -> Uuid,
        task_id -> Uuid,
        collector_id -> Uuid,
        verification -> Jsonb,
        collected_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only points ledger. `task_id` is unique so a task can be
    /// rewarded at most once.
    reward_transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        amount -> Int4,
        description -> Text,
        task_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        message -> Text,
        is_read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reports -> users (user_id));
diesel::joinable!(collected_wastes -> collection_tasks (task_id));
diesel::joinable!(reward_transactions -> users (user_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    reports,
    collection_tasks,
    collected_wastes,
    reward_transactions,
    notifications,
);
