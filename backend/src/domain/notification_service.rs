//! Notification inbox.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    NotificationRepository, NotificationRepositoryError, NotificationsCommand,
};
use crate::domain::{Error, Notification, UserId};

/// Implements [`NotificationsCommand`].
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[async_trait]
impl<N> NotificationsCommand for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn unread(&self, user_id: &UserId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_unread(user_id)
            .await
            .map_err(map_notification_error)
    }

    async fn mark_read(&self, user_id: &UserId, notification_id: Uuid) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(user_id, notification_id)
            .await
            .map_err(map_notification_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "notification {notification_id} not found"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockNotificationRepository;
    use rstest::rstest;

    #[rstest]
    #[case::owned(true, None)]
    #[case::foreign_or_missing(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn mark_read_reports_missing_notifications(
        #[case] updated: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let mut repo = MockNotificationRepository::new();
        repo.expect_mark_read()
            .times(1)
            .return_once(move |_, _| Ok(updated));

        let result = NotificationService::new(Arc::new(repo))
            .mark_read(&UserId::random(), Uuid::new_v4())
            .await;
        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[tokio::test]
    async fn unread_maps_connection_failures() {
        let mut repo = MockNotificationRepository::new();
        repo.expect_list_unread()
            .times(1)
            .return_once(|_| Err(NotificationRepositoryError::connection("refused")));

        let error = NotificationService::new(Arc::new(repo))
            .unread(&UserId::random())
            .await
            .expect_err("unavailable");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
