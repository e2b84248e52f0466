//! `SeaORM` implementation of the [`AccountService`] trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task;
use tracing::info;

use crate::auth::{self, TokenKeys};
use crate::config::Config;
use crate::db::{IdentityWrite, NewUser, Store, User};
use crate::services::account_service::{
    AccountError, AccountService, AuthSession, ProfileInput, RegisterInput,
};

pub struct SeaOrmAccountService {
    store: Store,
    config: Arc<RwLock<Config>>,
    tokens: Arc<TokenKeys>,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>, tokens: Arc<TokenKeys>) -> Self {
        Self {
            store,
            config,
            tokens,
        }
    }

    /// Argon2 hashing is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let auth_config = self.config.read().await.auth.clone();
        task::spawn_blocking(move || auth::hash_password(&password, Some(&auth_config)))
            .await
            .map_err(|e| AccountError::Internal(format!("Hashing task panicked: {e}")))?
            .map_err(AccountError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AccountError> {
        task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| AccountError::Internal(format!("Verification task panicked: {e}")))?
            .map_err(AccountError::from)
    }

    fn session(&self, user: User) -> Result<AuthSession, AccountError> {
        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| AccountError::Internal(format!("Failed to issue token: {e}")))?;

        Ok(AuthSession { user, token })
    }

    async fn validate_password_length(&self, password: &str) -> Result<(), AccountError> {
        let min = self.config.read().await.auth.min_password_length;
        if password.chars().count() < min {
            return Err(AccountError::Validation(format!(
                "Password must be at least {min} characters"
            )));
        }
        Ok(())
    }
}

fn validate_identity_fields(username: &str, email: &str) -> Result<(), AccountError> {
    if username.trim().is_empty() {
        return Err(AccountError::Validation("Username is required".to_string()));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AccountError::Validation(
            "A valid email is required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn register(&self, input: RegisterInput) -> Result<AuthSession, AccountError> {
        validate_identity_fields(&input.username, &input.email)?;
        self.validate_password_length(&input.password).await?;

        // Friendly pre-check; the unique indexes remain the authority.
        if self
            .store
            .identity_taken(&input.username, &input.email, None)
            .await?
        {
            return Err(AccountError::IdentityTaken);
        }

        let password_hash = self.hash_password(input.password).await?;

        let outcome = self
            .store
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                school: input.school,
                phone: input.phone,
            })
            .await?;

        match outcome {
            IdentityWrite::Ok(user) => {
                info!("Registered user {} ({})", user.id, user.username);
                self.session(user)
            }
            IdentityWrite::Conflict => Err(AccountError::IdentityTaken),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AccountError> {
        let Some((user, hash)) = self.store.get_user_by_email_with_password(email).await? else {
            return Err(AccountError::InvalidCredentials);
        };

        if !self.verify_password(password.to_string(), hash).await? {
            return Err(AccountError::InvalidCredentials);
        }

        self.session(user)
    }

    async fn update_profile(
        &self,
        user_id: i32,
        input: ProfileInput,
    ) -> Result<User, AccountError> {
        validate_identity_fields(&input.username, &input.email)?;

        if self
            .store
            .identity_taken(&input.username, &input.email, Some(user_id))
            .await?
        {
            return Err(AccountError::IdentityTaken);
        }

        let outcome = self
            .store
            .update_user_profile(
                user_id,
                &input.username,
                &input.email,
                input.school,
                input.phone,
            )
            .await?;

        match outcome {
            IdentityWrite::Ok(user) => Ok(user),
            IdentityWrite::Conflict => Err(AccountError::IdentityTaken),
        }
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        self.validate_password_length(new_password).await?;

        if current_password == new_password {
            return Err(AccountError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let hash = self
            .store
            .user_password_hash(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        if !self
            .verify_password(current_password.to_string(), hash)
            .await?
        {
            return Err(AccountError::InvalidCredentials);
        }

        let new_hash = self.hash_password(new_password.to_string()).await?;
        self.store.update_user_password(user_id, new_hash).await?;

        info!("Password changed for user {user_id}");

        Ok(())
    }
}
