//! Note model

use serde::{Deserialize, Serialize};

/// Maximum slug length, matching the `slug` column width.
pub const MAX_SLUG_LEN: usize = 100;

/// A personal note.
///
/// Notes are private: every read and write path is scoped to the author,
/// and anyone else asking for one is told it does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note body
    pub text: String,
    /// URL-safe identifier, unique across all users
    pub slug: String,
    /// Owning user
    pub author_id: i64,
}

/// Input for creating or updating a note.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub text: String,
    /// Explicit slug; derived from the title when absent or blank
    pub slug: Option<String>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// The slug the caller asked for, if any non-blank one was given.
    pub fn requested_slug(&self) -> Option<&str> {
        self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_slug_counts_as_absent() {
        let input = NoteInput::new("Title", "Text").with_slug("   ");
        assert_eq!(input.requested_slug(), None);
    }

    #[test]
    fn test_requested_slug_is_trimmed() {
        let input = NoteInput::new("Title", "Text").with_slug(" my-note ");
        assert_eq!(input.requested_slug(), Some("my-note"));
    }
}
