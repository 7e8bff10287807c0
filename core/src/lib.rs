//! Local todo list core: an owned collection with durable persistence.
//!
//! # Overview
//! `TodoStore` owns the ordered todo collection (newest first) and the active
//! filter. Hosts forward user intents to it (add, toggle, update, delete,
//! clear completed, set filter) and read back `filtered_view` and `stats`.
//! After every mutation that changed something the full collection is
//! written through a `Storage` adapter.
//!
//! # Design
//! - Operations never fail. Blank text, unchanged text and unknown ids are
//!   no-ops, so UI races such as a double-clicked delete are harmless.
//! - `Storage` is the only I/O seam. `FileStorage` is the durable adapter,
//!   `MemoryStorage` the fake used in tests. Both go through `codec`.
//! - Persistence errors are typed (`StorageError`) but never escape the
//!   store: a bad load starts empty, a bad save is logged via `tracing`.
//! - Time comes from a `Clock` so tests can control timestamps.

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use config::StorageConfig;
pub use error::StorageError;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::TodoStore;
pub use types::{Filter, Todo, TodoStats, UnknownFilter};
