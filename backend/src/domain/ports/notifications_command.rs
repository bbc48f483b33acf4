//! Driving port for the notification inbox.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Notification, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsCommand: Send + Sync {
    /// Unread notifications, newest first.
    async fn unread(&self, user_id: &UserId) -> Result<Vec<Notification>, Error>;

    /// Mark one of the caller's notifications as read.
    async fn mark_read(&self, user_id: &UserId, notification_id: Uuid) -> Result<(), Error>;
}
