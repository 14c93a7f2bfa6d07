//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind once, backlog, accept)
//!     → connection.rs (id, open/released accounting)
//!     → Hand off to the transmitter handler
//! ```
//!
//! # Design Decisions
//! - One listener for the process lifetime, never rebound
//! - Backlog is kept small; peers beyond it are refused by the kernel

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
