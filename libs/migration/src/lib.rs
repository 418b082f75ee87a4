//! Embedded schema migrations for the todo store.
//!
//! The SQL files under `migrations/` are compiled into the binary, so the
//! server can bring an empty database up to date at startup without any
//! files on disk.

use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
