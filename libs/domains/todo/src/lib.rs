//! ToDo Domain
//!
//! CRUD over a single `todo` table, exposed through the `todo.v1.ToDoService`
//! RPC contract and an HTTP/JSON gateway that forwards into it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐
//! │ tonic impl  │   │ JSON gateway │  ← handlers (forwards over gRPC)
//! └──────┬──────┘   └──────┬───────┘
//!        └────────┬────────┘
//! ┌───────────────▼───────────────┐
//! │          TodoService          │  ← version gate, conversions, row checks
//! └───────────────┬───────────────┘
//! ┌───────────────▼───────────────┐
//! │   TodoStore / TodoConnection  │  ← per-request scoped connection
//! └───────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todo::{PgTodoStore, TodoService};
//! use rpc::todo::v1::ReadAllRequest;
//!
//! # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//! let service = TodoService::new(PgTodoStore::new(pool));
//! let all = service
//!     .read_all(ReadAllRequest { api: "v1".into() })
//!     .await?;
//! println!("{} tasks", all.to_dos.len());
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod error;
pub mod handlers;
pub mod postgres;
pub mod service;
pub mod store;

/// The single API version this service implements
pub const API_VERSION: &str = "v1";

pub use error::{TodoError, TodoResult};
pub use handlers::grpc_router;
pub use postgres::{PgTodoConnection, PgTodoStore};
pub use service::TodoService;
pub use store::{NewTodo, TodoConnection, TodoRow, TodoStore};
