//! In-app notifications.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Notification category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Reward,
    Task,
    Info,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reward => "reward",
            Self::Task => "task",
            Self::Info => "info",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "reward" => Self::Reward,
            "task" => Self::Task,
            "info" => Self::Info,
            _ => Self::Other(value),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(value: NotificationKind) -> Self {
        match value {
            NotificationKind::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

/// Message queued for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// A new unread notification.
    pub fn unread(
        id: Uuid,
        user_id: UserId,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            kind,
            message: message.into(),
            is_read: false,
            created_at,
        }
    }
}

/// Text for the reward notification sent after a verified collection.
pub fn collection_reward_message(points: u32) -> String {
    format!("You earned {points} points for collecting waste!")
}

/// Text for the reward notification sent after a report.
pub fn report_reward_message(points: u32) -> String {
    format!("You earned {points} points for reporting waste!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::reward("reward", NotificationKind::Reward)]
    #[case::task("task", NotificationKind::Task)]
    #[case::other("badge", NotificationKind::Other("badge".to_owned()))]
    fn kind_parses_from_storage(#[case] raw: &str, #[case] expected: NotificationKind) {
        assert_eq!(NotificationKind::from(raw.to_owned()), expected);
    }

    #[rstest]
    fn new_notifications_are_unread() {
        let notification = Notification::unread(
            Uuid::new_v4(),
            UserId::random(),
            NotificationKind::Reward,
            collection_reward_message(42),
            Utc::now(),
        );
        assert!(!notification.is_read);
        assert_eq!(
            notification.message,
            "You earned 42 points for collecting waste!"
        );
    }
}
