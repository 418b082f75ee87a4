//! PostgreSQL connection management for the todo service
//!
//! Builds an `sqlx` pool from discrete connection parameters, retries the
//! initial connect with backoff, runs embedded migrations and offers a
//! cheap health probe.
//!
//! # Features
//!
//! - `config` - `PostgresConfig: core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//!
//! let config = PostgresConfig::from_env()?;
//! let pool = postgres::connect_from_config_with_retry(&config, None).await?;
//! postgres::run_migrations(&pool, &migration::MIGRATOR, "todo").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
