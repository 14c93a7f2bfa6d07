//! Transmitter subsystem.
//!
//! # Data Flow
//! ```text
//! Listener::accept (Idle)
//!     → handler.rs (Serving: read → classify → log → delay → close)
//!     → server.rs (back to Idle, next accept)
//! ```
//!
//! # Design Decisions
//! - Strictly serial: the delay of one message holds back the next accept
//! - Per-connection failures never leave the handler

pub mod handler;
pub mod server;

pub use handler::{handle_connection, Report};
pub use server::{DriverState, TransmitterServer};
