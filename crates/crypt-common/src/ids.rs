//! ID types for scene nodes and host operations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for node IDs.
static NODE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a node in an area's tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(NODE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Creates a node ID from a raw value (for deserialization).
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid node ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) node ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for an asynchronous load or unload issued to the host.
///
/// Handles are minted by the host; the controller only stores and polls them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadHandle(u64);

impl LoadHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LoadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_raw_roundtrip() {
        let id = NodeId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert!(!NodeId::NULL.is_valid());
    }

    #[test]
    fn test_load_handle_display() {
        assert_eq!(LoadHandle::from_raw(7).to_string(), "load#7");
    }
}
