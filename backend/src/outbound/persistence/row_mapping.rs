//! Conversions between Diesel rows and domain values.
//!
//! Rows are re-validated on the way in: a row that no longer satisfies a
//! domain invariant surfaces as a query error naming the offending record.

use crate::domain::{
    CollectionTask, CollectionTaskDraft, DisplayName, EmailAddress, Location, Notification,
    NotificationKind, Report, ReportDraft, RewardTransaction, RewardTransactionDraft, TaskStatus,
    TransactionKind, User, UserId, WasteAmount, WasteClassification, WasteType,
};

use super::models::{
    CollectionTaskRow, NewCollectionTaskRow, NewNotificationRow, NewRewardTransactionRow,
    NotificationRow, ReportRow, RewardTransactionRow, UserRow,
};

pub(crate) fn user_from_row(row: UserRow) -> Result<User, String> {
    let email = EmailAddress::new(&row.email)
        .map_err(|err| format!("user {} has invalid email: {err}", row.id))?;
    let display_name = DisplayName::new(row.display_name)
        .map_err(|err| format!("user {} has invalid display name: {err}", row.id))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        display_name,
        row.created_at,
    ))
}

pub(crate) fn report_from_row(row: ReportRow) -> Result<Report, String> {
    let id = row.id;
    let verification = row
        .verification
        .map(serde_json::from_value::<WasteClassification>)
        .transpose()
        .map_err(|err| format!("report {id} has unreadable verification: {err}"))?;
    Ok(Report::new(ReportDraft {
        id,
        user_id: UserId::from_uuid(row.user_id),
        location: Location::new(row.location).map_err(|err| format!("report {id}: {err}"))?,
        waste_type: WasteType::new(row.waste_type).map_err(|err| format!("report {id}: {err}"))?,
        amount: WasteAmount::new(row.amount).map_err(|err| format!("report {id}: {err}"))?,
        has_image: row.has_image,
        verification,
        created_at: row.created_at,
    }))
}

pub(crate) fn task_from_row(row: CollectionTaskRow) -> Result<CollectionTask, String> {
    let id = row.id;
    let status: TaskStatus = row
        .status
        .parse()
        .map_err(|err| format!("task {id}: {err}"))?;
    CollectionTask::new(CollectionTaskDraft {
        id,
        report_id: row.report_id,
        location: Location::new(row.location).map_err(|err| format!("task {id}: {err}"))?,
        waste_type: WasteType::new(row.waste_type).map_err(|err| format!("task {id}: {err}"))?,
        amount: WasteAmount::new(row.amount).map_err(|err| format!("task {id}: {err}"))?,
        status,
        collector_id: row.collector_id.map(UserId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| format!("task {id}: {err}"))
}

pub(crate) fn new_task_row(task: &CollectionTask) -> NewCollectionTaskRow<'_> {
    NewCollectionTaskRow {
        id: task.id(),
        report_id: task.report_id(),
        location: task.location().as_ref(),
        waste_type: task.waste_type().as_ref(),
        amount: task.amount().as_ref(),
        status: task.status().as_str(),
        collector_id: task.collector_id().map(|id| *id.as_uuid()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

pub(crate) fn reward_from_row(row: RewardTransactionRow) -> Result<RewardTransaction, String> {
    let id = row.id;
    let amount =
        u32::try_from(row.amount).map_err(|_| format!("reward {id} has negative amount"))?;
    RewardTransaction::new(RewardTransactionDraft {
        id,
        user_id: UserId::from_uuid(row.user_id),
        kind: TransactionKind::from(row.kind),
        amount,
        description: row.description,
        task_id: row.task_id,
        created_at: row.created_at,
    })
    .map_err(|err| format!("reward {id}: {err}"))
}

pub(crate) fn new_reward_row(
    reward: &RewardTransaction,
) -> Result<NewRewardTransactionRow<'_>, String> {
    let amount = i32::try_from(reward.amount())
        .map_err(|_| format!("reward {} amount exceeds storage range", reward.id()))?;
    Ok(NewRewardTransactionRow {
        id: reward.id(),
        user_id: *reward.user_id().as_uuid(),
        kind: reward.kind().as_str(),
        amount,
        description: reward.description(),
        task_id: reward.task_id(),
        created_at: reward.created_at(),
    })
}

pub(crate) fn notification_from_row(row: NotificationRow) -> Notification {
    Notification {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        kind: NotificationKind::from(row.kind),
        message: row.message,
        is_read: row.is_read,
        created_at: row.created_at,
    }
}

pub(crate) fn new_notification_row(notification: &Notification) -> NewNotificationRow<'_> {
    NewNotificationRow {
        id: notification.id,
        user_id: *notification.user_id.as_uuid(),
        kind: notification.kind.as_str(),
        message: &notification.message,
        is_read: notification.is_read,
        created_at: notification.created_at,
    }
}
