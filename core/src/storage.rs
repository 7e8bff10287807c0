//! Persistence adapters for the todo collection.
//!
//! # Design
//! `Storage` is the only I/O boundary of the crate and has exactly two
//! operations: `load` the whole collection and `save` the whole collection.
//! Both adapters store the same encoded payload from `codec`, so swapping the
//! in-memory fake for the durable file changes nothing about what is written.
//!
//! `MemoryStorage` shares its slot through `Rc<RefCell<_>>`: a test keeps one
//! handle to inspect writes while the store owns the other.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::codec;
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::types::Todo;

/// Durable home of the collection.
pub trait Storage {
    /// Read the persisted collection. A missing entry is an empty collection.
    fn load(&self) -> Result<Vec<Todo>, StorageError>;

    /// Replace the persisted collection with `todos`.
    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError> {
        (**self).save(todos)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemorySlot {
    entry: Option<String>,
    writes: usize,
    reject_writes: Option<String>,
}

/// In-memory stand-in for durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<MemorySlot>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `raw` already in the entry, as if a previous session wrote it.
    pub fn with_entry(raw: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.slot.borrow_mut().entry = Some(raw.into());
        storage
    }

    /// The raw payload currently stored, if any.
    pub fn entry(&self) -> Option<String> {
        self.slot.borrow().entry.clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.slot.borrow().writes
    }

    /// Make every following save fail with `reason`, or succeed again with `None`.
    pub fn reject_writes(&self, reason: Option<&str>) {
        self.slot.borrow_mut().reject_writes = reason.map(str::to_string);
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        match self.slot.borrow().entry.as_deref() {
            Some(raw) => codec::decode(raw),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError> {
        let raw = codec::encode(todos)?;
        let mut slot = self.slot.borrow_mut();
        if let Some(reason) = &slot.reject_writes {
            return Err(StorageError::WriteRejected(reason.clone()));
        }
        slot.entry = Some(raw);
        slot.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// One JSON file per entry, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        Ok(Self {
            path: config.entry_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `bytes` to `tmp`, flush it to disk, then rename it over the entry.
    fn replace_entry(&self, tmp: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let mut file = fs::File::create(tmp).map_err(|e| StorageError::io(tmp, e))?;
        file.write_all(bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| StorageError::io(tmp, e))?;
        drop(file);
        fs::rename(tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no saved todos at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };
        let todos = codec::decode(&raw)?;
        tracing::debug!("loaded {} todos from {}", todos.len(), self.path.display());
        Ok(todos)
    }

    fn save(&mut self, todos: &[Todo]) -> Result<(), StorageError> {
        let raw = codec::encode(todos)?;
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }

        let tmp = self.temp_path();
        if let Err(e) = self.replace_entry(&tmp, raw.as_bytes()) {
            // The entry is untouched; only the temp file may remain.
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("failed to remove {}: {cleanup}", tmp.display());
                }
            }
            return Err(e);
        }

        tracing::debug!("saved {} todos to {}", todos.len(), self.path.display());
        Ok(())
    }
}
