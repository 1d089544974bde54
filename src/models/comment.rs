//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reader comment under a news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: i64,
    /// The news item this comment belongs to
    pub news_id: i64,
    /// The user who wrote the comment; only they may edit or delete it
    pub author_id: i64,
    /// Comment text
    pub text: String,
    /// Creation timestamp, used for oldest-first ordering
    pub created: DateTime<Utc>,
}

/// Comment joined with its author's username for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub news_id: i64,
    pub author_id: i64,
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}
