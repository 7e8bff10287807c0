//! C-ABI wrapper around `todo-core`.
//!
//! # Overview
//! Exposes the todo store to a host view layer through `extern "C"`
//! functions: open a store, forward user intents (add, toggle, update,
//! delete, clear completed, set filter) and read back the filtered view and
//! statistics. The host owns rendering and input; this crate owns the state.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary. The store is wrapped in `AssertUnwindSafe`
//!   because its storage handle holds interior mutability.
//! - Null or malformed arguments degrade to the same result an unknown id
//!   would produce: null, `false` or zero. Nothing here reports an error.
//! - The C caller owns all returned pointers and must call the matching
//!   `todo_free_*` / `todo_store_free` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use todo_core::{FileStorage, MemoryStorage, Storage, StorageConfig, TodoStore};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use types::*;

/// Borrow a C string as UTF-8. Null or invalid UTF-8 yields `None`.
fn read_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

fn read_id(ptr: *const c_char) -> Option<Uuid> {
    read_str(ptr).and_then(|s| Uuid::parse_str(s).ok())
}

fn into_handle(storage: Box<dyn Storage>) -> *mut FfiTodoStore {
    Box::into_raw(Box::new(FfiTodoStore {
        inner: TodoStore::open(storage),
    }))
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a global `tracing` subscriber writing to stderr.
///
/// `filter` is an `EnvFilter` directive such as `"todo_core=debug"`; null
/// means `"info"`. Returns false if the directive is invalid or a subscriber
/// is already installed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let directive = if filter.is_null() {
            "info"
        } else {
            match read_str(filter) {
                Some(s) => s,
                None => return false,
            }
        };
        let Ok(env_filter) = EnvFilter::try_new(directive) else {
            return false;
        };
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Store lifecycle
// ---------------------------------------------------------------------------

/// Open a store persisted to `<dir>/<key>.json`, restoring any saved todos.
///
/// `key` may be null to use the default key `todos`. Returns null if `dir`
/// is null, either string is not UTF-8, or the key cannot name a file.
/// The caller must free the returned pointer with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_open(dir: *const c_char, key: *const c_char) -> *mut FfiTodoStore {
    catch_unwind(|| {
        let Some(dir) = read_str(dir) else {
            return std::ptr::null_mut();
        };
        let mut config = StorageConfig::new(dir);
        if !key.is_null() {
            match read_str(key) {
                Some(key) => config = config.with_key(key),
                None => return std::ptr::null_mut(),
            }
        }
        match FileStorage::from_config(&config) {
            Ok(storage) => into_handle(Box::new(storage)),
            Err(e) => {
                tracing::warn!("cannot open todo store: {e}");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Open a store that keeps its entry in memory only.
///
/// The caller must free the returned pointer with `todo_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_open_in_memory() -> *mut FfiTodoStore {
    catch_unwind(|| into_handle(Box::new(MemoryStorage::new()))).unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `todo_store_open*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_free(store: *mut FfiTodoStore) {
    if !store.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(store) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Add a todo with `text` (trimmed).
///
/// Returns the new id as a string, or null if `store` is null or `text` is
/// blank. The caller must free the returned string with `todo_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_add(store: *mut FfiTodoStore, text: *const c_char) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &mut *store };
        let Some(text) = read_str(text) else {
            return std::ptr::null_mut();
        };
        match store.inner.add(text) {
            Some(id) => into_c_string(id.to_string()),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Flip completion of the todo `id`. Returns whether a todo changed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_toggle(store: *mut FfiTodoStore, id: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return false;
        }
        let store = unsafe { &mut *store };
        read_id(id).is_some_and(|id| store.inner.toggle(id))
    }))
    .unwrap_or(false)
}

/// Commit an edit of todo `id`. Blank or unchanged text is ignored.
/// Returns whether a todo changed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_update(
    store: *mut FfiTodoStore,
    id: *const c_char,
    text: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return false;
        }
        let store = unsafe { &mut *store };
        match (read_id(id), read_str(text)) {
            (Some(id), Some(text)) => store.inner.update(id, text),
            _ => false,
        }
    }))
    .unwrap_or(false)
}

/// Delete todo `id`. Returns whether a todo was removed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_delete(store: *mut FfiTodoStore, id: *const c_char) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return false;
        }
        let store = unsafe { &mut *store };
        read_id(id).is_some_and(|id| store.inner.delete(id))
    }))
    .unwrap_or(false)
}

/// Delete every completed todo. Returns how many were removed.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_clear_completed(store: *mut FfiTodoStore) -> u32 {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return 0;
        }
        let store = unsafe { &mut *store };
        u32::try_from(store.inner.clear_completed()).unwrap_or(u32::MAX)
    }))
    .unwrap_or(0)
}

/// Select which todos `todo_store_filtered_view` returns.
///
/// `filter` is an `FfiFilter` discriminant. Returns false if `store` is null
/// or the discriminant is unknown; the active filter is then unchanged.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_set_filter(store: *mut FfiTodoStore, filter: u32) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return false;
        }
        let store = unsafe { &mut *store };
        match FfiFilter::from_raw(filter) {
            Some(f) => {
                store.inner.set_filter(f.into());
                true
            }
            None => false,
        }
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// The active filter. Returns `All` if `store` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_get_filter(store: *const FfiTodoStore) -> FfiFilter {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiFilter::All;
        }
        let store = unsafe { &*store };
        store.inner.filter().into()
    }))
    .unwrap_or(FfiFilter::All)
}

/// Counts over the whole collection. All zero if `store` is null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_stats(store: *const FfiTodoStore) -> FfiTodoStats {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return FfiTodoStats::default();
        }
        let store = unsafe { &*store };
        store.inner.stats().into()
    }))
    .unwrap_or_default()
}

/// Todos matching the active filter, newest first.
///
/// Returns null only if `store` is null; an empty view is a list with
/// `len == 0`. The caller must free the list with `todo_free_list`.
#[unsafe(no_mangle)]
pub extern "C" fn todo_store_filtered_view(store: *const FfiTodoStore) -> *mut FfiTodoList {
    catch_unwind(AssertUnwindSafe(|| {
        if store.is_null() {
            return std::ptr::null_mut();
        }
        let store = unsafe { &*store };
        FfiTodoList::from_todos(store.inner.filtered_view())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a list returned by `todo_store_filtered_view`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_list(list: *mut FfiTodoList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| FfiTodoList::free(list));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn todo_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { std::ffi::CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
