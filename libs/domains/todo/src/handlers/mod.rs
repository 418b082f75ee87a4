mod grpc;
pub mod json;

use axum::{Router, routing::get, routing::post};
use rpc::todo::v1::to_do_service_client::ToDoServiceClient;
use tonic::transport::Channel;

/// Create router for the gRPC-backed JSON gateway
///
/// | Method   | Path            | RPC     |
/// |----------|-----------------|---------|
/// | `POST`   | `/v1/task`      | Create  |
/// | `GET`    | `/v1/task/all`  | ReadAll |
/// | `GET`    | `/v1/task/{id}` | Read    |
/// | `PUT`    | `/v1/task/{id}` | Update  |
/// | `DELETE` | `/v1/task/{id}` | Delete  |
pub fn grpc_router(client: ToDoServiceClient<Channel>) -> Router {
    Router::new()
        .route("/v1/task", post(grpc::create_task))
        .route("/v1/task/all", get(grpc::list_tasks))
        .route(
            "/v1/task/{id}",
            get(grpc::get_task)
                .put(grpc::update_task)
                .delete(grpc::delete_task),
        )
        .with_state(client)
}
