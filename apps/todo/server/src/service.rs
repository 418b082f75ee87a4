//! ToDo gRPC service implementation
//!
//! Requests go to the domain service unchanged; the only work here is
//! turning `TodoError` into a `tonic::Status`.

use domain_todo::{TodoError, TodoService, TodoStore};
use rpc::todo::v1::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ReadAllRequest,
    ReadAllResponse, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
    to_do_service_server::ToDoService,
};
use tonic::{Code, Request, Response, Status};
use tracing::{error, warn};

/// gRPC service implementation for tasks
///
/// Generic over the store so tests can run it against memory.
pub struct ToDoServiceImpl<S: TodoStore> {
    service: TodoService<S>,
}

impl<S: TodoStore> ToDoServiceImpl<S> {
    pub fn new(service: TodoService<S>) -> Self {
        Self { service }
    }
}

fn to_status(method: &'static str, err: TodoError) -> Status {
    match err.code() {
        Code::Unknown | Code::Unavailable => error!(method, error = %err, "ToDo call failed"),
        _ => warn!(method, error = %err, "ToDo call rejected"),
    }
    err.into()
}

#[tonic::async_trait]
impl<S: TodoStore> ToDoService for ToDoServiceImpl<S> {
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CreateResponse>, Status> {
        self.service
            .create(request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("Create", e))
    }

    async fn read(&self, request: Request<ReadRequest>) -> Result<Response<ReadResponse>, Status> {
        self.service
            .read(request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("Read", e))
    }

    async fn update(
        &self,
        request: Request<UpdateRequest>,
    ) -> Result<Response<UpdateResponse>, Status> {
        self.service
            .update(request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("Update", e))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        self.service
            .delete(request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("Delete", e))
    }

    async fn read_all(
        &self,
        request: Request<ReadAllRequest>,
    ) -> Result<Response<ReadAllResponse>, Status> {
        self.service
            .read_all(request.into_inner())
            .await
            .map(Response::new)
            .map_err(|e| to_status("ReadAll", e))
    }
}
