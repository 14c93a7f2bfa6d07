//! Pager Transmitter Stub Library
//!
//! A stand-in for a pager transmitter: accepts one TCP connection at a
//! time, reads a `\r`-delimited message until the peer closes, classifies
//! and logs it, then pauses before serving the next peer.

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod message;
pub mod net;
pub mod observability;
pub mod transmitter;

pub use config::{MessagePolicy, StubConfig};
pub use lifecycle::Shutdown;
pub use transmitter::TransmitterServer;
