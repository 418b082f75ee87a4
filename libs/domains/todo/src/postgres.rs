use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

use crate::{
    error::{TodoError, TodoResult},
    store::{NewTodo, TodoConnection, TodoRow, TodoStore},
};

const INSERT_SQL: &str =
    "INSERT INTO todo (title, description, reminder) VALUES ($1, $2, $3) RETURNING id";
const SELECT_BY_ID_SQL: &str = "SELECT id, title, description, reminder FROM todo WHERE id = $1";
const SELECT_ALL_SQL: &str = "SELECT id, title, description, reminder FROM todo";
const UPDATE_SQL: &str =
    "UPDATE todo SET title = $1, description = $2, reminder = $3 WHERE id = $4";
const DELETE_SQL: &str = "DELETE FROM todo WHERE id = $1";

/// PostgreSQL-backed store over a shared `sqlx` pool
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    type Connection = PgTodoConnection;

    async fn acquire(&self) -> TodoResult<PgTodoConnection> {
        let conn = self.pool.acquire().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to acquire database connection");
            TodoError::Unavailable(e.to_string())
        })?;
        Ok(PgTodoConnection(conn))
    }
}

/// A pooled connection, returned to the pool on drop
pub struct PgTodoConnection(PoolConnection<Postgres>);

fn rows_affected(what: &str, count: u64) -> TodoResult<i64> {
    i64::try_from(count).map_err(|_| TodoError::count_overflow(what, count))
}

#[async_trait]
impl TodoConnection for PgTodoConnection {
    async fn insert(&mut self, todo: &NewTodo) -> TodoResult<i64> {
        sqlx::query_scalar::<_, i64>(INSERT_SQL)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.reminder)
            .fetch_one(&mut *self.0)
            .await
            .map_err(|e| TodoError::Unknown(format!("failed to insert into ToDo: {e}")))
    }

    async fn select_by_id(&mut self, id: i64) -> TodoResult<Vec<TodoRow>> {
        sqlx::query_as::<_, TodoRow>(SELECT_BY_ID_SQL)
            .bind(id)
            .fetch_all(&mut *self.0)
            .await
            .map_err(|e| TodoError::Unknown(format!("failed to select from ToDo: {e}")))
    }

    async fn select_all(&mut self) -> TodoResult<Vec<TodoRow>> {
        sqlx::query_as::<_, TodoRow>(SELECT_ALL_SQL)
            .fetch_all(&mut *self.0)
            .await
            .map_err(|e| TodoError::Unknown(format!("failed to select from ToDo: {e}")))
    }

    async fn update(&mut self, row: &TodoRow) -> TodoResult<i64> {
        let result = sqlx::query(UPDATE_SQL)
            .bind(&row.title)
            .bind(&row.description)
            .bind(row.reminder)
            .bind(row.id)
            .execute(&mut *self.0)
            .await
            .map_err(|e| TodoError::Unknown(format!("failed to update ToDo: {e}")))?;
        rows_affected("updated rows", result.rows_affected())
    }

    async fn delete(&mut self, id: i64) -> TodoResult<i64> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .execute(&mut *self.0)
            .await
            .map_err(|e| TodoError::Unknown(format!("failed to delete ToDo: {e}")))?;
        rows_affected("deleted rows", result.rows_affected())
    }
}
