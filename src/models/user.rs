//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted username length, matching the `username` column width.
pub const MAX_USERNAME_LEN: usize = 150;

/// A registered user.
///
/// Users authenticate with a username and password and own the comments
/// and notes they create. There are no roles: every permission decision
/// in the system is an ownership check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Password hash (argon2id, PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a user that has not been persisted yet.
    ///
    /// The password must already be hashed; see
    /// `services::password::hash_password`.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: 0, // assigned on insert
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this user authored the given entity.
    pub fn owns(&self, author_id: i64) -> bool {
        self.id == author_id
    }
}
