//! Inbound message handling.
//!
//! # Data Flow
//! ```text
//! socket bytes
//!     → reader.rs (1024-byte chunks, UTF-8 per chunk, until close)
//!     → record.rs (split on '\r' → ParsedRecord)
//!     → MessagePolicy::classify (Valid | Invalid(reason))
//! ```
//!
//! `frame.rs` holds the outbound side: building a wire message for a cap code.

pub mod frame;
pub mod reader;
pub mod record;

pub use frame::{encode_transmission, FrameError, MAX_CAP_CODE, MIN_CAP_CODE};
pub use reader::{read_message, ReadError};
pub use record::{Classification, InvalidReason, ParsedRecord};
