//! Lookup-or-create sign-in.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    LoginRequest, UserOnboarding, UserPersistenceError, UserRepository,
};
use crate::domain::{DisplayName, Error, User, UserId};

/// Implements [`UserOnboarding`] over a [`UserRepository`].
#[derive(Clone)]
pub struct UserOnboardingService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserOnboardingService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email already registered: {email}"))
        }
    }
}

#[async_trait]
impl<U> UserOnboarding for UserOnboardingService<U>
where
    U: UserRepository,
{
    async fn login(&self, request: LoginRequest) -> Result<User, Error> {
        let LoginRequest {
            email,
            display_name,
        } = request;

        if let Some(existing) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        {
            return Ok(existing);
        }

        let user = User::new(
            UserId::random(),
            email,
            display_name.unwrap_or_else(DisplayName::anonymous),
            self.clock.utc(),
        );
        match self.users.create(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), "created account on first login");
                Ok(user)
            }
            // A concurrent first login won the insert; return its row.
            Err(UserPersistenceError::DuplicateEmail { .. }) => self
                .users
                .find_by_email(user.email())
                .await
                .map_err(map_user_error)?
                .ok_or_else(|| Error::internal("account vanished after duplicate insert")),
            Err(err) => Err(map_user_error(err)),
        }
    }

    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[cfg(test)]
#[path = "user_onboarding_service_tests.rs"]
mod tests;
