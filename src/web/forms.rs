//! Form payloads and validation errors
//!
//! Forms deserialize from `application/x-www-form-urlencoded` bodies with
//! every field defaulted, so a missing field is an empty string rather than
//! a deserialization failure; presence checks happen in the handlers and
//! surface as `FormErrors`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::NoteInput;

/// Message attached to a required field left empty.
pub const REQUIRED_FIELD: &str = "Обязательное поле.";

/// Comment submission form
#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

/// Note create/edit form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    /// Convert the raw form into a service input.
    pub fn into_input(self) -> NoteInput {
        let slug = self.slug.trim();
        NoteInput {
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            slug: if slug.is_empty() {
                None
            } else {
                Some(slug.to_string())
            },
        }
    }
}

/// Login form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `next` query parameter carried through the login flow.
#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

impl NextQuery {
    /// The post-login destination.
    ///
    /// Only same-site paths are honored; anything else falls back to the
    /// home page so the login form cannot be used as an open redirect.
    pub fn destination(&self) -> &str {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
            _ => "/",
        }
    }
}

/// Validation errors bound to a re-rendered form.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors {
    /// Per-field error messages
    pub fields: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a single field (e.g. bad credentials)
    pub non_field: Vec<String>,
}

impl FormErrors {
    pub fn add_field(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_form_blank_slug_becomes_none() {
        let form = NoteForm {
            title: " Title ".to_string(),
            text: "Text".to_string(),
            slug: "  ".to_string(),
        };
        let input = form.into_input();
        assert_eq!(input.title, "Title");
        assert_eq!(input.slug, None);
    }

    #[test]
    fn test_note_form_keeps_explicit_slug() {
        let form = NoteForm {
            title: "Title".to_string(),
            text: "Text".to_string(),
            slug: " my-slug ".to_string(),
        };
        assert_eq!(form.into_input().slug.as_deref(), Some("my-slug"));
    }

    #[test]
    fn test_next_query_accepts_local_paths() {
        let query = NextQuery {
            next: Some("/notes/".to_string()),
        };
        assert_eq!(query.destination(), "/notes/");
    }

    #[test]
    fn test_next_query_rejects_external_targets() {
        for bad in ["https://evil.example", "//evil.example", "notes"] {
            let query = NextQuery {
                next: Some(bad.to_string()),
            };
            assert_eq!(query.destination(), "/", "{} should be rejected", bad);
        }
        assert_eq!(NextQuery::default().destination(), "/");
    }

    #[test]
    fn test_form_errors_accumulate() {
        let mut errors = FormErrors::default();
        assert!(errors.is_empty());

        errors.add_field("text", REQUIRED_FIELD);
        errors.add_field("text", "Не ругайтесь!");
        errors.add_non_field("что-то пошло не так");

        assert!(!errors.is_empty());
        assert_eq!(errors.fields["text"].len(), 2);
        assert_eq!(errors.non_field.len(), 1);
    }
}
