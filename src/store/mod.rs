//! Flat JSON-file todo store.
//!
//! The store is the sole source of truth: it is read in full and
//! rewritten in full on every mutation. A missing or malformed file
//! reads as an empty store; a failed write is surfaced as an error.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// A persisted task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    pub done: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Whole-file JSON todo store
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all todos. Missing or malformed files read as empty.
    pub fn load(&self) -> Vec<Todo> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Failed to read todo store");
                }
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Todo>>(&raw) {
            Ok(todos) => todos,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Todo store is malformed, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Rewrite the whole store
    pub fn save(&self, todos: &[Todo]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(todos)?;
        fs::write(&self.path, json).map_err(|e| StoreError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Append one todo, allocating the next id, and persist immediately.
    ///
    /// Ids are `max(existing) + 1`, or 1 on an empty store.
    pub fn add(&self, text: impl Into<String>) -> StoreResult<Todo> {
        let mut todos = self.load();
        let next_id = todos.iter().map(|t| t.id).max().map_or(1, |max| max + 1);

        let todo = Todo {
            id: next_id,
            text: text.into(),
            done: false,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        todos.push(todo.clone());
        self.save(&todos)?;
        Ok(todo)
    }
}
