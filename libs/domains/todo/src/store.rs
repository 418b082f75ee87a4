use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::TodoResult;

/// One row of the `todo` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reminder: DateTime<Utc>,
}

/// Column values for an insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub reminder: DateTime<Utc>,
}

/// Source of per-request connections.
///
/// A connection is held for the duration of one operation and released when
/// it is dropped, so every exit path (including a cancelled future) gives it
/// back. Acquisition failures are reported as `TodoError::Unavailable` and
/// are never retried here.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    type Connection: TodoConnection;

    async fn acquire(&self) -> TodoResult<Self::Connection>;
}

/// Single-statement accessors on an acquired connection.
///
/// Statement failures are `TodoError::Unknown`; row counts come back as the
/// driver reports them, and interpreting zero is up to the caller.
#[async_trait]
pub trait TodoConnection: Send {
    /// Insert a row and return the assigned id
    async fn insert(&mut self, todo: &NewTodo) -> TodoResult<i64>;

    /// Every row matching `id`; the result is not limited so duplicates stay visible
    async fn select_by_id(&mut self, id: i64) -> TodoResult<Vec<TodoRow>>;

    /// Every row, in the order the store returns them
    async fn select_all(&mut self) -> TodoResult<Vec<TodoRow>>;

    /// Overwrite title, description and reminder of `row.id`, returning rows affected
    async fn update(&mut self, row: &TodoRow) -> TodoResult<i64>;

    /// Delete `id`, returning rows affected
    async fn delete(&mut self, id: i64) -> TodoResult<i64>;
}
