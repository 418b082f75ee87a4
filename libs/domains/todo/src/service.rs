use std::sync::Arc;

use rpc::todo::v1::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use tracing::instrument;

use crate::API_VERSION;
use crate::conversions::{new_todo_from_proto, required_todo, row_from_proto, row_to_proto};
use crate::error::{TodoError, TodoResult};
use crate::store::{TodoConnection, TodoStore};

/// The five ToDo operations, shared by every transport.
///
/// Each call checks the API version, acquires its own connection, runs a
/// single statement and releases the connection before returning.
pub struct TodoService<S: TodoStore> {
    store: Arc<S>,
}

impl<S: TodoStore> Clone for TodoService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// Empty means unspecified and is accepted
fn check_api(api: &str) -> TodoResult<()> {
    if !api.is_empty() && api != API_VERSION {
        return Err(TodoError::unsupported_api_version(api));
    }
    Ok(())
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    #[instrument(skip(self, request), fields(api = %request.api))]
    pub async fn create(&self, request: CreateRequest) -> TodoResult<CreateResponse> {
        check_api(&request.api)?;
        let mut conn = self.store.acquire().await?;

        let todo = new_todo_from_proto(required_todo(request.to_do)?)?;
        let id = conn.insert(&todo).await?;

        tracing::info!(todo_id = id, "Created todo");
        Ok(CreateResponse {
            api: API_VERSION.to_string(),
            id,
        })
    }

    #[instrument(skip(self, request), fields(api = %request.api, todo_id = request.id))]
    pub async fn read(&self, request: ReadRequest) -> TodoResult<ReadResponse> {
        check_api(&request.api)?;
        let mut conn = self.store.acquire().await?;

        let mut rows = conn.select_by_id(request.id).await?;
        if rows.len() > 1 {
            tracing::error!(todo_id = request.id, rows = rows.len(), "Duplicate rows for id");
            return Err(TodoError::duplicate_rows(request.id));
        }
        let row = rows.pop().ok_or(TodoError::NotFound(request.id))?;

        Ok(ReadResponse {
            api: API_VERSION.to_string(),
            to_do: Some(row_to_proto(row)?),
        })
    }

    #[instrument(skip(self, request), fields(api = %request.api))]
    pub async fn update(&self, request: UpdateRequest) -> TodoResult<UpdateResponse> {
        check_api(&request.api)?;
        let mut conn = self.store.acquire().await?;

        let row = row_from_proto(required_todo(request.to_do)?)?;
        let updated = conn.update(&row).await?;
        if updated == 0 {
            return Err(TodoError::NotFound(row.id));
        }

        tracing::info!(todo_id = row.id, "Updated todo");
        Ok(UpdateResponse {
            api: API_VERSION.to_string(),
            updated,
        })
    }

    #[instrument(skip(self, request), fields(api = %request.api, todo_id = request.id))]
    pub async fn delete(&self, request: DeleteRequest) -> TodoResult<DeleteResponse> {
        check_api(&request.api)?;
        let mut conn = self.store.acquire().await?;

        let deleted = conn.delete(request.id).await?;
        if deleted == 0 {
            return Err(TodoError::NotFound(request.id));
        }

        tracing::info!(todo_id = request.id, "Deleted todo");
        Ok(DeleteResponse {
            api: API_VERSION.to_string(),
            deleted,
        })
    }

    #[instrument(skip(self, request), fields(api = %request.api))]
    pub async fn read_all(&self, request: ReadAllRequest) -> TodoResult<ReadAllResponse> {
        check_api(&request.api)?;
        let mut conn = self.store.acquire().await?;

        let to_dos = conn
            .select_all()
            .await?
            .into_iter()
            .map(row_to_proto)
            .collect::<TodoResult<Vec<_>>>()?;

        Ok(ReadAllResponse {
            api: API_VERSION.to_string(),
            to_dos,
        })
    }
}
