//! # Axum Helpers
//!
//! Pieces of the HTTP/JSON gateway that are not specific to one domain.
//!
//! - **[`errors`]**: gRPC status → HTTP status + JSON error body
//! - **[`server`]**: router layering and bounded graceful serve
//! - **[`shutdown`]**: signal handling around a shared `CancellationToken`

pub mod errors;
pub mod server;
pub mod shutdown;

pub use errors::{AppError, ErrorResponse, API_VERSION_METADATA_KEY};
pub use server::{create_router, serve_with_shutdown};
pub use shutdown::ShutdownCoordinator;
