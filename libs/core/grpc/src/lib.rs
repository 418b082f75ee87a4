//! # gRPC plumbing
//!
//! Shared helpers for both ends of the `todo.v1` RPC surface:
//!
//! - **Channels**: tuned HTTP/2 endpoints, eager or lazy
//!   ([`create_channel`], [`create_channel_lazy_with_config`]).
//! - **Server**: environment-driven [`server::ServerConfig`], health
//!   reporting and startup logging.
//! - **Conversions**: `google.protobuf.Timestamp` ↔ `DateTime<Utc>` with
//!   range checking.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::{create_channel_lazy_with_config, ChannelConfig};
//! use rpc::todo::v1::to_do_service_client::ToDoServiceClient;
//!
//! let channel = create_channel_lazy_with_config("http://127.0.0.1:50051", ChannelConfig::default())?;
//! let client = ToDoServiceClient::new(channel);
//! ```

pub mod channel;
pub mod conversions;
pub mod error;
pub mod server;

pub use channel::{ChannelConfig, create_channel, create_channel_lazy_with_config};
pub use error::{GrpcError, GrpcResult};
