//! Relay configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). The listening address is the only setting that can fail;
//! everything else falls back to its default when missing or invalid.

use std::net::SocketAddr;

use crate::error::RelayError;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP/WebSocket server to.
    pub listen_addr: SocketAddr,

    /// Capacity of each connection's outbound event queue.
    pub outbound_queue_capacity: usize,

    /// Display names are truncated to this many characters.
    pub max_display_name_len: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            outbound_queue_capacity: 1024,
            max_display_name_len: 64,
            log_format: LogFormat::Pretty,
        }
    }
}

const DEFAULT_PORT: u16 = 3001;

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// `LISTEN_ADDR` wins over `PORT`; with neither set the relay binds
    /// `0.0.0.0:3001`. Calls `dotenvy::dotenv().ok()` to optionally load a
    /// `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR` is not a valid
    /// [`SocketAddr`] or `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RelayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let defaults = Self::default();

        let listen_addr = match (lookup("LISTEN_ADDR"), lookup("PORT")) {
            (Some(addr), _) => addr.parse::<SocketAddr>().map_err(|_| {
                RelayError::Config(format!("LISTEN_ADDR `{addr}` is not a socket address"))
            })?,
            (None, Some(port)) => {
                let port: u16 = port.parse().map_err(|_| {
                    RelayError::Config(format!("PORT `{port}` is not a port number"))
                })?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
            (None, None) => defaults.listen_addr,
        };

        let outbound_queue_capacity = parse_or(
            &lookup,
            "OUTBOUND_QUEUE_CAPACITY",
            defaults.outbound_queue_capacity,
        )
        .max(1);
        let max_display_name_len =
            parse_or(&lookup, "MAX_DISPLAY_NAME_LEN", defaults.max_display_name_len).max(1);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            listen_addr,
            outbound_queue_capacity,
            max_display_name_len,
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
