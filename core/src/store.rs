//! The canonical todo collection and its operation set.
//!
//! # Design
//! `TodoStore` is the single writer of the collection. Every mutation goes
//! through one of its methods, each of which either changes the collection
//! and then saves it, or changes nothing and saves nothing. Invalid input and
//! unknown ids are silent no-ops for the caller; the boolean results and
//! `debug` traces exist for hosts and tests that want to know.
//!
//! Persistence is best-effort. A failed load starts an empty collection and a
//! failed save is logged, leaving the in-memory collection authoritative.

use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::storage::Storage;
use crate::types::{trim_text, Filter, Todo, TodoStats};

/// Owned todo collection backed by a `Storage`.
pub struct TodoStore<S: Storage> {
    todos: Vec<Todo>,
    filter: Filter,
    storage: S,
    clock: Box<dyn Clock>,
}

impl<S: Storage> TodoStore<S> {
    /// Open a store over `storage` using the wall clock.
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Open a store over `storage`, restoring whatever it holds. Load failures
    /// are logged and yield an empty collection.
    pub fn with_clock(storage: S, clock: impl Clock + 'static) -> Self {
        let todos = match storage.load() {
            Ok(todos) => {
                tracing::info!("restored {} todos", todos.len());
                todos
            }
            Err(e) => {
                tracing::warn!("failed to load todos, starting empty: {e}");
                Vec::new()
            }
        };
        Self {
            todos,
            filter: Filter::default(),
            storage,
            clock: Box::new(clock),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Prepend a new todo. Returns its id, or `None` if `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<Uuid> {
        let text = trim_text(text);
        if text.is_empty() {
            tracing::debug!("ignoring add with blank text");
            return None;
        }
        let id = self.fresh_id();
        let todo = Todo::new(id, text.to_string(), self.clock.now());
        self.todos.insert(0, todo);
        self.persist();
        Some(id)
    }

    /// Flip completion of `id`. Returns whether a todo changed.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        let now = self.clock.now();
        let Some(todo) = self.find_mut(id) else {
            tracing::debug!(%id, "toggle on unknown todo");
            return false;
        };
        todo.toggle(now);
        self.persist();
        true
    }

    /// Replace the text of `id` with trimmed `text`. Blank or unchanged text is
    /// rejected. Returns whether a todo changed.
    pub fn update(&mut self, id: Uuid, text: &str) -> bool {
        let text = trim_text(text);
        let now = self.clock.now();
        let Some(todo) = self.find_mut(id) else {
            tracing::debug!(%id, "update on unknown todo");
            return false;
        };
        if text.is_empty() || text == todo.text() {
            tracing::debug!(%id, "ignoring blank or unchanged text");
            return false;
        }
        todo.set_text(text.to_string(), now);
        self.persist();
        true
    }

    /// Remove `id`. Returns whether a todo was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let Some(index) = self.todos.iter().position(|t| t.id() == id) else {
            tracing::debug!(%id, "delete on unknown todo");
            return false;
        };
        self.todos.remove(index);
        self.persist();
        true
    }

    /// Remove every completed todo. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed());
        let removed = before - self.todos.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Change which todos `filtered_view` returns. Never touches storage.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// The full collection, newest first.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id() == id)
    }

    /// Todos matching the active filter, in collection order.
    pub fn filtered_view(&self) -> Vec<&Todo> {
        self.todos.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Counts over the full collection, ignoring the filter.
    pub fn stats(&self) -> TodoStats {
        TodoStats::from_todos(&self.todos)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn find_mut(&mut self, id: Uuid) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id() == id)
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.todos) {
            tracing::warn!("failed to save todos: {e}");
        }
    }
}

impl<S: Storage + std::fmt::Debug> std::fmt::Debug for TodoStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("todos", &self.todos)
            .field("filter", &self.filter)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}
