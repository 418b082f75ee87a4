//! Protobuf messages and tonic stubs for the ToDo service.
//!
//! Sources are checked in under `src/gen`, produced from `proto/todo/v1/todo.proto`.

pub mod todo {
  pub mod v1 {
    include!("gen/todo.v1.rs");
  }
}
