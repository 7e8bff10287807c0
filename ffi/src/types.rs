//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion and release helpers live
//! here to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use todo_core::codec::format_timestamp;
use todo_core::{Filter, Storage, Todo, TodoStats, TodoStore};

/// Opaque handle to a `TodoStore`. C callers receive a pointer to this and
/// pass it back into every `todo_store_*` function.
pub struct FfiTodoStore {
    pub(crate) inner: TodoStore<Box<dyn Storage>>,
}

/// Filter kind as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiFilter {
    All = 0,
    Active = 1,
    Completed = 2,
}

impl FfiFilter {
    /// Decode a raw discriminant received from C.
    pub(crate) fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(FfiFilter::All),
            1 => Some(FfiFilter::Active),
            2 => Some(FfiFilter::Completed),
            _ => None,
        }
    }
}

impl From<Filter> for FfiFilter {
    fn from(f: Filter) -> Self {
        match f {
            Filter::All => FfiFilter::All,
            Filter::Active => FfiFilter::Active,
            Filter::Completed => FfiFilter::Completed,
        }
    }
}

impl From<FfiFilter> for Filter {
    fn from(f: FfiFilter) -> Self {
        match f {
            FfiFilter::All => Filter::All,
            FfiFilter::Active => Filter::Active,
            FfiFilter::Completed => Filter::Completed,
        }
    }
}

/// Collection counts, returned by value.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FfiTodoStats {
    pub total: u32,
    pub active: u32,
    pub completed: u32,
}

impl From<TodoStats> for FfiTodoStats {
    fn from(s: TodoStats) -> Self {
        Self {
            total: saturate(s.total),
            active: saturate(s.active),
            completed: saturate(s.completed),
        }
    }
}

/// A single todo exposed to C. Timestamps are RFC 3339 UTC strings.
#[repr(C)]
pub struct FfiTodo {
    pub id: *mut c_char,
    pub text: *mut c_char,
    pub completed: bool,
    pub created_at: *mut c_char,
    pub updated_at: *mut c_char,
}

impl FfiTodo {
    fn from_core(todo: &Todo) -> Self {
        Self {
            id: into_c_string(todo.id().to_string()),
            text: into_c_string(todo.text().to_string()),
            completed: todo.completed(),
            created_at: into_c_string(format_timestamp(todo.created_at())),
            updated_at: into_c_string(format_timestamp(todo.updated_at())),
        }
    }

    /// Free the C-string fields (but not the struct itself).
    fn free_fields(&self) {
        for ptr in [self.id, self.text, self.created_at, self.updated_at] {
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    }
}

/// A list of todos exposed to C, in view order.
#[repr(C)]
pub struct FfiTodoList {
    pub items: *mut FfiTodo,
    pub len: u32,
}

impl FfiTodoList {
    /// Convert borrowed todos into a heap-allocated `FfiTodoList`.
    pub(crate) fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> *mut Self {
        // `len` is a u32, so the list is capped at what it can describe.
        let ffi_todos: Vec<FfiTodo> = todos
            .into_iter()
            .take(u32::MAX as usize)
            .map(FfiTodo::from_core)
            .collect();
        let len = saturate(ffi_todos.len());
        let items = if ffi_todos.is_empty() {
            std::ptr::null_mut()
        } else {
            // Exact capacity so `free` can rebuild the boxed slice.
            Box::into_raw(ffi_todos.into_boxed_slice()) as *mut FfiTodo
        };
        Box::into_raw(Box::new(FfiTodoList { items, len }))
    }

    /// Release a list created by `from_todos`, including every string in it.
    pub(crate) fn free(list: *mut Self) {
        let list = unsafe { Box::from_raw(list) };
        if list.items.is_null() || list.len == 0 {
            return;
        }
        let items = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                list.items,
                list.len as usize,
            ))
        };
        for item in items.iter() {
            item.free_fields();
        }
    }
}

/// Hand a Rust string to C. Interior NULs cannot be represented and are
/// dropped so the rest of the text survives.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    let cstring = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|b| *b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    cstring.into_raw()
}

fn saturate(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
