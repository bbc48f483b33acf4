//! Driven port for the notification inbox.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Notification, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notification adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notification repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Unread notifications for a user, newest first.
    async fn list_unread(
        &self,
        user: &UserId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    /// Flag a notification as read. Returns `false` when the user owns no
    /// notification with that id.
    async fn mark_read(&self, user: &UserId, id: Uuid) -> Result<bool, NotificationRepositoryError>;
}
