//! In-memory `TodoStore`
//!
//! Behaves like the PostgreSQL store for everything the service can observe:
//! ids are assigned from a sequence starting at 1 and rows come back in
//! insertion order. Tests can also make acquisition fail, plant duplicate
//! rows and count connections that were never released.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use domain_todo::{NewTodo, TodoConnection, TodoError, TodoResult, TodoRow, TodoStore};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<TodoRow>,
}

#[derive(Default)]
struct Shared {
    table: Mutex<Table>,
    unavailable: AtomicBool,
    open_connections: AtomicUsize,
}

/// Cloning shares the same table
#[derive(Clone, Default)]
pub struct InMemoryTodoStore {
    shared: Arc<Shared>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `acquire` fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a row verbatim, including a duplicate id
    pub fn insert_raw(&self, row: TodoRow) {
        let mut table = self.table();
        table.next_id = table.next_id.max(row.id);
        table.rows.push(row);
    }

    /// Snapshot of every row
    pub fn rows(&self) -> Vec<TodoRow> {
        self.table().rows.clone()
    }

    /// Connections handed out and not yet dropped
    pub fn open_connections(&self) -> usize {
        self.shared.open_connections.load(Ordering::SeqCst)
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.shared
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    type Connection = InMemoryConnection;

    async fn acquire(&self) -> TodoResult<InMemoryConnection> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(TodoError::Unavailable("in-memory store is offline".to_string()));
        }
        self.shared.open_connections.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryConnection {
            store: self.clone(),
        })
    }
}

/// Connection into an `InMemoryTodoStore`; counted until dropped
pub struct InMemoryConnection {
    store: InMemoryTodoStore,
}

impl Drop for InMemoryConnection {
    fn drop(&mut self) {
        self.store
            .shared
            .open_connections
            .fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoConnection for InMemoryConnection {
    async fn insert(&mut self, todo: &NewTodo) -> TodoResult<i64> {
        let mut table = self.store.table();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(TodoRow {
            id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            reminder: todo.reminder,
        });
        Ok(id)
    }

    async fn select_by_id(&mut self, id: i64) -> TodoResult<Vec<TodoRow>> {
        Ok(self
            .store
            .table()
            .rows
            .iter()
            .filter(|row| row.id == id)
            .cloned()
            .collect())
    }

    async fn select_all(&mut self) -> TodoResult<Vec<TodoRow>> {
        Ok(self.store.rows())
    }

    async fn update(&mut self, row: &TodoRow) -> TodoResult<i64> {
        let mut table = self.store.table();
        let mut updated = 0;
        for existing in table.rows.iter_mut().filter(|r| r.id == row.id) {
            existing.title = row.title.clone();
            existing.description = row.description.clone();
            existing.reminder = row.reminder;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&mut self, id: i64) -> TodoResult<i64> {
        let mut table = self.store.table();
        let before = table.rows.len();
        table.rows.retain(|row| row.id != id);
        Ok((before - table.rows.len()) as i64)
    }
}
