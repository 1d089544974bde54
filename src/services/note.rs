//! Note service
//!
//! Notes are strictly private. Every lookup is (viewer, slug): a note that
//! belongs to someone else resolves to `NotFound`, never to a permission
//! error, so slugs cannot be probed for existence.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::db::repositories::NoteRepository;
use crate::models::note::MAX_SLUG_LEN;
use crate::models::{Note, NoteInput};

/// Error types for note operations
#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    /// Slug already used by another note; the message is the form error
    #[error("{0}")]
    SlugTaken(String),

    /// Note missing, or the caller is not its author
    #[error("Note not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The user-facing message for a slug collision.
pub fn slug_taken_message(slug: &str) -> String {
    format!(
        "{} - такой slug уже существует, придумайте уникальное значение!",
        slug
    )
}

/// Derive a URL-safe slug from a note title.
///
/// Lowercases the title, keeps letters and digits (including non-ASCII
/// letters), collapses everything else into single hyphens and trims the
/// result to the column width.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    // Truncation can land right after a separator.
    truncated.trim_end_matches('-').to_string()
}

/// Note service
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Create a note for `author_id`.
    ///
    /// The slug comes from the input when given, otherwise from the title.
    /// A slug already carried by any note is rejected before touching
    /// storage.
    pub async fn create(
        &self,
        author_id: i64,
        input: NoteInput,
    ) -> Result<Note, NoteServiceError> {
        let slug = match input.requested_slug() {
            Some(s) => s.to_string(),
            None => generate_slug(&input.title),
        };

        if self
            .repo
            .get_by_slug(&slug)
            .await
            .context("Failed to check slug")?
            .is_some()
        {
            return Err(NoteServiceError::SlugTaken(slug_taken_message(&slug)));
        }

        let note = Note {
            id: 0,
            title: input.title,
            text: input.text,
            slug,
            author_id,
        };

        let created = self
            .repo
            .create(&note)
            .await
            .context("Failed to store note")?;
        Ok(created)
    }

    /// The viewer's notes, oldest first.
    pub async fn list(&self, author_id: i64) -> Result<Vec<Note>> {
        self.repo.list_by_author(author_id).await
    }

    /// Fetch a note for its author; anyone else gets `NotFound`.
    pub async fn get(&self, viewer_id: i64, slug: &str) -> Result<Note, NoteServiceError> {
        let note = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to look up note")?
            .ok_or(NoteServiceError::NotFound)?;

        if note.author_id != viewer_id {
            return Err(NoteServiceError::NotFound);
        }
        Ok(note)
    }

    /// Rewrite a note. Author-only; slug collisions with *other* notes are
    /// rejected, keeping the old slug's row untouched.
    pub async fn update(
        &self,
        viewer_id: i64,
        slug: &str,
        input: NoteInput,
    ) -> Result<Note, NoteServiceError> {
        let existing = self.get(viewer_id, slug).await?;

        let new_slug = match input.requested_slug() {
            Some(s) => s.to_string(),
            None => generate_slug(&input.title),
        };

        if let Some(holder) = self
            .repo
            .get_by_slug(&new_slug)
            .await
            .context("Failed to check slug")?
        {
            if holder.id != existing.id {
                return Err(NoteServiceError::SlugTaken(slug_taken_message(&new_slug)));
            }
        }

        let updated = Note {
            id: existing.id,
            title: input.title,
            text: input.text,
            slug: new_slug,
            author_id: existing.author_id,
        };

        self.repo
            .update(&updated)
            .await
            .context("Failed to update note")?;
        Ok(updated)
    }

    /// Delete a note. Author-only.
    pub async fn delete(&self, viewer_id: i64, slug: &str) -> Result<(), NoteServiceError> {
        let note = self.get(viewer_id, slug).await?;
        self.repo
            .delete(note.id)
            .await
            .context("Failed to delete note")?;
        Ok(())
    }
}
