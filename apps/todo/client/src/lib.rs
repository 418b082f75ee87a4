//! Command-line client for the ToDo service
//!
//! Runs create → read → update → read all → delete against a running
//! server, over gRPC or over the HTTP/JSON gateway.

pub mod grpc;
pub mod rest;

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use clap::{Parser, ValueEnum};
use eyre::{Result, eyre};
use grpc_client::conversions::datetime_to_timestamp;
use rpc::todo::v1::ToDo;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Grpc,
    Rest,
}

#[derive(Debug, Parser)]
#[command(name = "todo-client", about = "Exercise a running ToDo server", version)]
pub struct Cli {
    /// Transport to use
    #[arg(long, value_enum, default_value_t = Mode::Grpc)]
    pub mode: Mode,

    /// gRPC `host:port` or gateway base URL
    #[arg(long, default_value = "localhost:9090")]
    pub server: String,

    /// Deadline for the whole sequence, in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,
}

/// What the sequence observed, step by step
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub read: ToDo,
    pub updated: i64,
    pub listed: Vec<ToDo>,
    pub deleted: i64,
}

/// Task stamped with the current time, as the first step sends it
pub fn sample_todo() -> Result<ToDo> {
    let now = Utc::now();
    let stamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(ToDo {
        id: 0,
        title: format!("title ({stamp})"),
        description: format!("description ({stamp})"),
        reminder: Some(datetime_to_timestamp(now).map_err(|e| eyre!(e))?),
    })
}

/// Prefix `http://` unless a scheme is already present
pub fn with_scheme(server: &str) -> String {
    if server.contains("://") {
        server.to_string()
    } else {
        format!("http://{server}")
    }
}

/// Run the whole sequence in `mode`, bounded by `deadline`
pub async fn run(mode: Mode, server: &str, deadline: Duration) -> Result<Report> {
    let sequence = async {
        match mode {
            Mode::Grpc => grpc::run(server).await,
            Mode::Rest => rest::run(server).await,
        }
    };

    let report = tokio::time::timeout(deadline, sequence)
        .await
        .map_err(|_| eyre!("sequence did not finish within {deadline:?}"))??;

    info!(
        id = report.id,
        updated = report.updated,
        listed = report.listed.len(),
        deleted = report.deleted,
        "Sequence complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["todo-client"]).unwrap();
        assert_eq!(cli.mode, Mode::Grpc);
        assert_eq!(cli.server, "localhost:9090");
        assert_eq!(cli.timeout_secs, 5);
    }

    #[test]
    fn test_cli_rest_mode() {
        let cli = Cli::try_parse_from([
            "todo-client",
            "--mode",
            "rest",
            "--server",
            "http://localhost:8080",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Rest);
        assert!(Cli::try_parse_from(["todo-client", "--mode", "soap"]).is_err());
    }

    #[test]
    fn test_sample_todo_is_valid() {
        let todo = sample_todo().unwrap();
        assert!(todo.title.starts_with("title ("));
        assert!(todo.reminder.is_some());
    }
}
