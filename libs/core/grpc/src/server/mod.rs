//! gRPC server helpers
//!
//! ```ignore
//! use grpc_client::server::{GrpcServer, ServerConfig};
//! use rpc::todo::v1::to_do_service_server::SERVICE_NAME;
//!
//! let config = ServerConfig::from_env()?;
//! let (mut health_reporter, health_service) = create_health_service();
//! GrpcServer::setup_health(&mut health_reporter, SERVICE_NAME).await;
//! GrpcServer::log_startup(&config, SERVICE_NAME);
//! ```

mod builder;
mod config;

pub use builder::{GrpcServer, create_health_service};
pub use config::ServerConfig;
