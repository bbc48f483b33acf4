//! Driving port for passwordless sign-in and profile lookup.
//!
//! Sign-in is keyed by email: the first login creates the account and later
//! logins return it unchanged.

use async_trait::async_trait;

use crate::domain::{DisplayName, EmailAddress, Error, User, UserId};

/// Sign-in payload after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: EmailAddress,
    /// Name used only when the account is created.
    pub display_name: Option<DisplayName>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserOnboarding: Send + Sync {
    /// Return the account for an email, creating it on first sight.
    async fn login(&self, request: LoginRequest) -> Result<User, Error>;

    /// Load the signed-in account.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
