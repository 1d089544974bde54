//! User service
//!
//! Signup, login/logout and session validation. Sessions are opaque tokens
//! stored server-side; an expired token is indistinguishable from a missing
//! one and is deleted on sight.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::user::MAX_USERNAME_LEN;
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};

/// How long a login session stays valid.
const SESSION_TTL_DAYS: i64 = 14;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 4;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Invalid credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid signup input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Username already taken
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Signup input
#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub password: String,
}

impl SignupInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// User service for accounts and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
        }
    }

    /// Register a new user.
    pub async fn signup(&self, input: SignupInput) -> Result<User, UserServiceError> {
        let username = input.username.trim();

        if username.is_empty() {
            return Err(UserServiceError::Validation(
                "Username must not be empty".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(UserServiceError::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self
            .user_repo
            .get_by_username(username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = self
            .user_repo
            .create(&User::new(username, password_hash))
            .await
            .context("Failed to create user")?;

        tracing::info!(user = %user.username, "New user registered");
        Ok(user)
    }

    /// Verify credentials and open a session.
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(input.username.trim())
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::Authentication("Invalid username or password".to_string())
            })?;

        let valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;
        if !valid {
            return Err(UserServiceError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let session = Session::issue(user.id, SESSION_TTL_DAYS);
        self.session_repo
            .create(&session)
            .await
            .context("Failed to store session")?;

        tracing::debug!(user = %user.username, "Session opened");
        Ok(session)
    }

    /// Close the session behind a token. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Returns `None` for unknown or expired tokens; expired tokens are
    /// deleted as a side effect.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            let _ = self.session_repo.delete(token).await;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;

        Ok(user)
    }

    /// Sweep expired sessions; returns how many were removed.
    pub async fn sweep_sessions(&self) -> Result<i64, UserServiceError> {
        let swept = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to sweep sessions")?;
        if swept > 0 {
            tracing::debug!(swept, "Removed expired sessions");
        }
        Ok(swept)
    }
}
