//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file (loader.rs)
//!     → BIND_ON_ADDRESS / BIND_ON_PORT / TIME_BETWEEN_MSG / MESSAGE_POLICY
//!     → validation.rs (semantic checks)
//!     → StubConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults so the stub runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_from_env, ConfigError};
pub use schema::{ListenerConfig, MessagePolicy, ObservabilityConfig, StubConfig, TransmitterConfig};
