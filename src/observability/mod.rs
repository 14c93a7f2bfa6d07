//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! listener / handler / driver produce:
//!     → logging.rs (structured log events, one span per connection)
//!     → metrics.rs (counters, gauges)
//! ```

pub mod logging;
pub mod metrics;
