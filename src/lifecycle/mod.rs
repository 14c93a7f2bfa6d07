//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Metrics → Bind listener
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger → driver loop exits → listener dropped
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No drain on shutdown: an in-flight connection is dropped

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
