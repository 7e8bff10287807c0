//! JSON encoding of the persisted collection.
//!
//! # Design
//! The persisted form is a JSON array of `TodoRecord` objects with camelCase
//! keys and RFC 3339 timestamp strings. Decoding is an explicit two-step
//! process: serde checks the shape, then `TodoRecord::into_todo` checks every
//! invariant a live `Todo` carries. Surrounding blanks in text are trimmed
//! rather than rejected. Any failure rejects the whole payload so the store
//! never holds a partially restored collection.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;
use crate::types::{trim_text, Todo};

/// Wire shape of one persisted todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Todo> for TodoRecord {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id().hyphenated().to_string(),
            text: todo.text().to_string(),
            completed: todo.completed(),
            created_at: format_timestamp(todo.created_at()),
            updated_at: format_timestamp(todo.updated_at()),
        }
    }
}

impl TodoRecord {
    /// Validate the record and turn it into a live `Todo`. `index` is only
    /// used for error reporting.
    pub fn into_todo(self, index: usize) -> Result<Todo, StorageError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StorageError::invalid(index, format!("bad id {:?}: {e}", self.id)))?;
        let text = trim_text(&self.text);
        if text.is_empty() {
            return Err(StorageError::invalid(index, "empty text"));
        }
        let text = text.to_string();
        let created_at = parse_timestamp(&self.created_at)
            .map_err(|e| StorageError::invalid(index, format!("bad createdAt: {e}")))?;
        let updated_at = parse_timestamp(&self.updated_at)
            .map_err(|e| StorageError::invalid(index, format!("bad updatedAt: {e}")))?;
        if updated_at < created_at {
            return Err(StorageError::invalid(index, "updatedAt precedes createdAt"));
        }
        Ok(Todo::restore(id, text, self.completed, created_at, updated_at))
    }
}

/// Serialize the collection, preserving order.
pub fn encode(todos: &[Todo]) -> Result<String, StorageError> {
    let records: Vec<TodoRecord> = todos.iter().map(TodoRecord::from).collect();
    serde_json::to_string(&records).map_err(StorageError::Encode)
}

/// Parse and validate a persisted collection, preserving order.
pub fn decode(raw: &str) -> Result<Vec<Todo>, StorageError> {
    let records: Vec<TodoRecord> = serde_json::from_str(raw).map_err(StorageError::Decode)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut todos = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let todo = record.into_todo(index)?;
        if !seen.insert(todo.id()) {
            return Err(StorageError::invalid(
                index,
                format!("duplicate id {}", todo.id()),
            ));
        }
        todos.push(todo);
    }
    Ok(todos)
}

/// RFC 3339 in UTC with a `Z` suffix and only as many fractional digits as
/// the value needs, so any timestamp survives a round trip exactly.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}
