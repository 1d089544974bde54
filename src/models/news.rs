//! News model

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A published news item.
///
/// News is written once (seeded or imported) and never edited or deleted
/// through the web surface; readers only list and view it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Headline
    pub title: String,
    /// Body text
    pub text: String,
    /// Publication date, used for newest-first ordering
    pub date: NaiveDate,
}

/// Input for creating a news item.
#[derive(Debug, Clone)]
pub struct CreateNewsInput {
    pub title: String,
    pub text: String,
    /// Publication date; today when absent
    pub date: Option<NaiveDate>,
}

impl CreateNewsInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: None,
        }
    }

    pub fn dated(title: impl Into<String>, text: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            date: Some(date),
        }
    }

    /// The effective publication date.
    pub fn date_or_today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }
}
