//! Domain service for registration, login and profile management.

use serde::Deserialize;
use thiserror::Error;

use crate::db::User;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Username or email collides with another account. Backed by the
    /// unique indexes, so this also covers races the pre-check missed.
    #[error("Username or email already in use")]
    IdentityTaken,

    #[error("Email or password incorrect")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub school: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub username: String,
    pub email: String,
    pub school: Option<String>,
    pub phone: Option<String>,
}

/// A signed-in identity: the public user record plus a bearer token whose
/// claims resolve back to it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Domain service trait for account operations.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account and signs the new user in.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::IdentityTaken`] on a duplicate username or
    /// email, [`AccountError::Validation`] on malformed input.
    async fn register(&self, input: RegisterInput) -> Result<AuthSession, AccountError>;

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] on any mismatch; the
    /// message does not reveal whether the email exists.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AccountError>;

    /// Overwrites the caller's profile fields.
    async fn update_profile(&self, user_id: i32, input: ProfileInput)
    -> Result<User, AccountError>;

    /// Changes the caller's password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] if the current password
    /// is wrong, [`AccountError::Validation`] if the new one is too short.
    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError>;
}
