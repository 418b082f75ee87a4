use crate::{env_or_default, env_parse_required, ConfigError};
use std::net::Ipv4Addr;

/// Address a single listener binds to.
///
/// The port has no default: a process that serves several listeners must
/// be told each port explicitly and refuses to start otherwise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
}

impl ListenerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Reads `{PREFIX}_HOST` (default 0.0.0.0) and `{PREFIX}_PORT` (required)
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let host = env_or_default(
            &format!("{prefix}_HOST"),
            &Ipv4Addr::UNSPECIFIED.to_string(),
        );
        let port = env_parse_required(&format!("{prefix}_PORT"))?;

        Ok(Self { host, port })
    }

    /// Get the listener address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
