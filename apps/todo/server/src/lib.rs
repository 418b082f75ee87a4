//! ToDo server
//!
//! One process, two listeners over the same service:
//!
//! ```text
//! gRPC client ──────────────────────────┐
//!                                       ↓
//! HTTP client → gateway (axum) → loopback gRPC → ToDoServiceImpl → TodoService → PostgreSQL
//! ```
//!
//! Both listeners are bound before either serves, and both watch one
//! shutdown token: SIGINT/SIGTERM, or either server failing, winds down
//! the pair.
//!
//! ## Modules
//!
//! - `config`: environment configuration
//! - `service`: tonic adapter over the domain service
//! - `grpc`: gRPC listener with health reporting
//! - `gateway`: HTTP/JSON listener forwarding over gRPC
//! - `server`: process lifecycle

pub mod config;
pub mod gateway;
pub mod grpc;
pub mod server;
pub mod service;

pub use config::{AppConfig, TransportConfig};
pub use server::{Listeners, run, serve};
pub use service::ToDoServiceImpl;
