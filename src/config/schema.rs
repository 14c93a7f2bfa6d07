//! Configuration schema definitions.
//!
//! All types derive Serde traits so a TOML file can supply any subset of
//! fields; everything missing falls back to the documented defaults.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the transmitter stub.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StubConfig {
    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Per-message behavior (pacing, validation policy).
    pub transmitter: TransmitterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address to bind (e.g., "0.0.0.0").
    pub bind_address: String,

    /// TCP port to bind.
    pub bind_port: u16,

    /// Pending connection queue length handed to `listen(2)`.
    pub backlog: u32,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 6000,
            backlog: 1,
        }
    }
}

/// Transmitter behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TransmitterConfig {
    /// Pause after each message, in seconds.
    pub delay_secs: u64,

    /// Field validation rules applied to every message.
    pub policy: MessagePolicy,

    /// Maximum bytes consumed per socket read.
    pub read_chunk_size: usize,

    /// Upper bound on one message; the read phase ends past it.
    pub max_message_bytes: usize,
}

impl TransmitterConfig {
    /// The inter-message delay as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            delay_secs: 2,
            policy: MessagePolicy::default(),
            read_chunk_size: 1024,
            max_message_bytes: 64 * 1024,
        }
    }
}

/// Which validation rules decide a message's classification.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    /// Exactly `<digits>\r<body>\r\r`.
    #[default]
    Strict,
    /// First two fields taken as-is.
    Lenient,
}

impl fmt::Display for MessagePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagePolicy::Strict => write!(f, "strict"),
            MessagePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

impl FromStr for MessagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(MessagePolicy::Strict),
            "lenient" => Ok(MessagePolicy::Lenient),
            other => Err(format!("unknown message policy '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
