//! Comment service
//!
//! Creation runs the moderation filter; every mutation and even the edit
//! page itself is scoped to the comment's author. A viewer who is not the
//! author learns nothing: the comment simply "does not exist" for them.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::db::repositories::{CommentRepository, NewsRepository};
use crate::models::{Comment, CommentWithAuthor};
use crate::services::moderation;

/// Error types for comment operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// Text contains a banned word
    #[error("Не ругайтесь!")]
    ProhibitedWord,

    /// Comment missing, or the caller is not its author
    #[error("Comment not found")]
    NotFound,

    /// The news item being commented on does not exist
    #[error("News not found")]
    NewsNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    news: Arc<dyn NewsRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, news: Arc<dyn NewsRepository>) -> Self {
        Self { comments, news }
    }

    /// Create a comment under a news item on behalf of `author_id`.
    pub async fn create(
        &self,
        news_id: i64,
        author_id: i64,
        text: &str,
    ) -> Result<Comment, CommentServiceError> {
        if self
            .news
            .get_by_id(news_id)
            .await
            .context("Failed to look up news")?
            .is_none()
        {
            return Err(CommentServiceError::NewsNotFound);
        }

        if moderation::find_banned_word(text).is_some() {
            return Err(CommentServiceError::ProhibitedWord);
        }

        let comment = self
            .comments
            .create(news_id, author_id, text, None)
            .await
            .context("Failed to store comment")?;
        Ok(comment)
    }

    /// Comments under a news item, oldest first.
    pub async fn list_for_news(&self, news_id: i64) -> Result<Vec<CommentWithAuthor>> {
        self.comments.list_by_news(news_id).await
    }

    /// Fetch a comment for its author; anyone else gets `NotFound`.
    pub async fn get_for_author(
        &self,
        id: i64,
        viewer_id: i64,
    ) -> Result<Comment, CommentServiceError> {
        let comment = self
            .comments
            .get_by_id(id)
            .await
            .context("Failed to look up comment")?
            .ok_or(CommentServiceError::NotFound)?;

        if comment.author_id != viewer_id {
            return Err(CommentServiceError::NotFound);
        }
        Ok(comment)
    }

    /// Replace a comment's text. Author-only; edits are moderated too.
    pub async fn edit(
        &self,
        id: i64,
        editor_id: i64,
        text: &str,
    ) -> Result<Comment, CommentServiceError> {
        let comment = self.get_for_author(id, editor_id).await?;

        if moderation::find_banned_word(text).is_some() {
            return Err(CommentServiceError::ProhibitedWord);
        }

        self.comments
            .update_text(comment.id, text)
            .await
            .context("Failed to update comment")?;

        Ok(Comment {
            text: text.to_string(),
            ..comment
        })
    }

    /// Delete a comment. Author-only.
    pub async fn delete(&self, id: i64, editor_id: i64) -> Result<(), CommentServiceError> {
        let comment = self.get_for_author(id, editor_id).await?;
        self.comments
            .delete(comment.id)
            .await
            .context("Failed to delete comment")?;
        Ok(())
    }
}
