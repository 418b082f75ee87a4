use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use axum_helpers::AppError;
use rpc::todo::v1::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, UpdateRequest,
    to_do_service_client::ToDoServiceClient,
};
use tonic::transport::Channel;

use crate::error::TodoError;

use super::json::{
    ApiQuery, CreateResponseJson, DeleteResponseJson, ReadAllResponseJson, ReadResponseJson,
    ToDoBody, UpdateResponseJson,
};

type Client = State<ToDoServiceClient<Channel>>;
type TaskId = WithRejection<Path<i64>, TodoError>;
type ApiParam = WithRejection<Query<ApiQuery>, TodoError>;
type JsonBody = WithRejection<Json<ToDoBody>, TodoError>;

/// Create a task via gRPC
pub async fn create_task(
    State(mut client): Client,
    WithRejection(Json(body), _): JsonBody,
) -> Result<Json<CreateResponseJson>, AppError> {
    let response = client
        .create(CreateRequest {
            api: body.api,
            to_do: body.to_do.map(Into::into),
        })
        .await?;

    Ok(Json(response.into_inner().into()))
}

/// Read a task by ID via gRPC
pub async fn get_task(
    State(mut client): Client,
    WithRejection(Path(id), _): TaskId,
    WithRejection(Query(query), _): ApiParam,
) -> Result<Json<ReadResponseJson>, AppError> {
    let response = client
        .read(ReadRequest {
            api: query.api,
            id,
        })
        .await?;

    Ok(Json(response.into_inner().into()))
}

/// Update a task via gRPC; the path id wins over the body id
pub async fn update_task(
    State(mut client): Client,
    WithRejection(Path(id), _): TaskId,
    WithRejection(Json(body), _): JsonBody,
) -> Result<Json<UpdateResponseJson>, AppError> {
    let mut to_do = body.to_do;
    if let Some(todo) = to_do.as_mut() {
        todo.id = id;
    }

    let response = client
        .update(UpdateRequest {
            api: body.api,
            to_do: to_do.map(Into::into),
        })
        .await?;

    Ok(Json(response.into_inner().into()))
}

/// Delete a task via gRPC
pub async fn delete_task(
    State(mut client): Client,
    WithRejection(Path(id), _): TaskId,
    WithRejection(Query(query), _): ApiParam,
) -> Result<Json<DeleteResponseJson>, AppError> {
    let response = client
        .delete(DeleteRequest {
            api: query.api,
            id,
        })
        .await?;

    Ok(Json(response.into_inner().into()))
}

/// List all tasks via gRPC
pub async fn list_tasks(
    State(mut client): Client,
    WithRejection(Query(query), _): ApiParam,
) -> Result<Json<ReadAllResponseJson>, AppError> {
    let response = client.read_all(ReadAllRequest { api: query.api }).await?;

    Ok(Json(response.into_inner().into()))
}
