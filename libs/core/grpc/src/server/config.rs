//! Server configuration loaded from environment variables.

use core_config::{ConfigError, FromEnv, ListenerConfig, env_or_default, env_parse_or_default};
use std::time::Duration;

/// Configuration for the gRPC listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`GRPC_HOST`, `GRPC_PORT`)
    pub listener: ListenerConfig,
    /// Accept and send Zstd compression (default: true)
    pub enable_compression: bool,
    /// Maximum message size for decoding (default: 8MB)
    pub max_decoding_message_size: usize,
    /// Maximum message size for encoding (default: 8MB)
    pub max_encoding_message_size: usize,
    /// Upper bound for a single call, on top of any client `grpc-timeout`
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn new(listener: ListenerConfig) -> Self {
        Self {
            listener,
            enable_compression: true,
            max_decoding_message_size: 8 * 1024 * 1024, // 8MB
            max_encoding_message_size: 8 * 1024 * 1024, // 8MB
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-call timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the address string (for logging).
    pub fn addr_string(&self) -> String {
        self.listener.address()
    }
}

impl FromEnv for ServerConfig {
    /// Reads:
    /// - `GRPC_HOST` (default: 0.0.0.0), `GRPC_PORT` (required)
    /// - `GRPC_COMPRESSION` (default: true)
    /// - `GRPC_MAX_MESSAGE_SIZE` (default: 8388608 / 8MB)
    /// - `REQUEST_TIMEOUT_SECS` (default: 30)
    fn from_env() -> Result<Self, ConfigError> {
        let listener = ListenerConfig::from_env_with_prefix("GRPC")?;
        let compression = env_or_default("GRPC_COMPRESSION", "true");
        let enable_compression = compression != "false" && compression != "0";
        let max_message_size = env_parse_or_default("GRPC_MAX_MESSAGE_SIZE", 8 * 1024 * 1024)?;
        let request_timeout = env_parse_or_default("REQUEST_TIMEOUT_SECS", 30u64)?;

        Ok(Self {
            listener,
            enable_compression,
            max_decoding_message_size: max_message_size,
            max_encoding_message_size: max_message_size,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }
}
