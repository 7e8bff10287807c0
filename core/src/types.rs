//! Domain types for the todo store.
//!
//! # Design
//! `Todo` keeps its fields private: a record only comes into existence through
//! `TodoStore::add` or through the validating decode step in `codec`, so the
//! text and timestamp invariants hold for every value a caller can observe.
//! `Filter` and `TodoStats` are plain data derived from the collection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: Uuid,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a fresh, not-yet-completed record. `text` must already be trimmed
    /// and non-empty.
    pub(crate) fn new(id: Uuid, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record from already validated persisted fields.
    pub(crate) fn restore(
        id: Uuid,
        text: String,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            completed,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    pub(crate) fn set_text(&mut self, text: String, now: DateTime<Utc>) {
        self.text = text;
        self.touch(now);
    }

    /// `updated_at` never moves backwards, even if the clock does.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }
}

/// Strip leading and trailing blanks from todo text.
///
/// Blanks are the characters a browser's `String.prototype.trim` removes:
/// Unicode whitespace except U+0085 (NEL), plus U+FEFF (BOM). Text saved by a
/// browser is therefore already trimmed under this rule.
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}'))
}

/// Which subset of the collection the view displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed(),
            Filter::Completed => todo.completed(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0:?}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

/// Aggregate counts over the full collection, independent of the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TodoStats {
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let mut stats = TodoStats::default();
        for todo in todos {
            stats.total += 1;
            if todo.completed() {
                stats.completed += 1;
            }
        }
        stats.active = stats.total - stats.completed;
        stats
    }
}
