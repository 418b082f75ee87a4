//! gRPC listener
//!
//! Serves `todo.v1.ToDoService` plus `grpc.health.v1.Health` on an
//! already-bound listener until the shutdown token is cancelled.

use std::time::Duration;

use axum_helpers::ShutdownCoordinator;
use domain_todo::{TodoService, TodoStore};
use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
use rpc::todo::v1::to_do_service_server::{SERVICE_NAME, ToDoServiceServer};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::service::ToDoServiceImpl;

/// Serve until shutdown, then stop accepting and let in-flight calls finish.
///
/// Calls still running `grace` after shutdown began are dropped. Health is
/// flipped to not-serving as soon as shutdown starts.
pub async fn serve<S: TodoStore>(
    listener: TcpListener,
    service: TodoService<S>,
    config: &ServerConfig,
    shutdown: ShutdownCoordinator,
    grace: Duration,
) -> Result<(), tonic::transport::Error> {
    let (mut health_reporter, health_service) = create_health_service();
    GrpcServer::setup_health(&mut health_reporter, SERVICE_NAME).await;

    let mut todo_service = ToDoServiceServer::new(ToDoServiceImpl::new(service))
        .max_decoding_message_size(config.max_decoding_message_size)
        .max_encoding_message_size(config.max_encoding_message_size);
    if config.enable_compression {
        todo_service = todo_service
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    let addr = listener.local_addr().ok();
    GrpcServer::log_startup(config, SERVICE_NAME);
    info!(addr = ?addr, "gRPC server listening");

    let drain = shutdown.clone();
    let signal = async move {
        drain.cancelled().await;
        GrpcServer::mark_not_serving(&mut health_reporter, SERVICE_NAME).await;
        info!("gRPC server draining in-flight calls");
    };

    let server = Server::builder()
        .timeout(config.request_timeout)
        .add_service(health_service)
        .add_service(todo_service)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal);

    match shutdown.bounded(grace, server).await {
        Some(result) => {
            let result = result.inspect_err(|e| {
                tracing::error!(error = %e, "gRPC server encountered an error");
            });
            info!(addr = ?addr, "gRPC server stopped");
            result
        }
        None => {
            warn!(
                addr = ?addr,
                grace = ?grace,
                "gRPC server did not drain within the grace period, forcing close"
            );
            Ok(())
        }
    }
}
