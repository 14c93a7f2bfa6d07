//! Connection identity and lifetime tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Count open connections and connections released so far
//! - Release each connection slot exactly once (on guard drop)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::observability::metrics;

/// Global atomic counter for connection IDs.
/// Using relaxed ordering is sufficient since we only need uniqueness, not synchronization.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct Counters {
    active: AtomicU64,
    released: AtomicU64,
}

/// Tracks open connections and how many have been released.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    counters: Arc<Counters>,
}

impl ConnectionTracker {
    /// Create a new connection tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new active connection. Returns a guard that releases it on drop.
    pub fn track(&self) -> ConnectionGuard {
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::set_active_connections(active);
        ConnectionGuard {
            counters: Arc::clone(&self.counters),
            id: ConnectionId::new(),
        }
    }

    /// Current count of open connections.
    pub fn active_count(&self) -> u64 {
        self.counters.active.load(Ordering::SeqCst)
    }

    /// Total connections released since the tracker was created.
    pub fn released_count(&self) -> u64 {
        self.counters.released.load(Ordering::SeqCst)
    }
}

/// Guard that tracks a connection's lifetime.
#[derive(Debug)]
pub struct ConnectionGuard {
    counters: Arc<Counters>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let active = self.counters.active.fetch_sub(1, Ordering::SeqCst) - 1;
        self.counters.released.fetch_add(1, Ordering::SeqCst);
        metrics::set_active_connections(active);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}
