//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (backlog > 0, chunk size > 0)
//! - Check addresses are parseable before anything is bound
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StubConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::StubConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not an IP address")]
    BindAddress(String),

    #[error("listener.backlog must be at least 1")]
    Backlog,

    #[error("transmitter.read_chunk_size must be at least 1")]
    ChunkSize,

    #[error("transmitter.max_message_bytes must be at least 1")]
    MessageLimit,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &StubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.listener.backlog == 0 {
        errors.push(ValidationError::Backlog);
    }

    if config.transmitter.read_chunk_size == 0 {
        errors.push(ValidationError::ChunkSize);
    }

    if config.transmitter.max_message_bytes == 0 {
        errors.push(ValidationError::MessageLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
