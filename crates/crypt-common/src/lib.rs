//! # Crypt Common
//!
//! Common types, utilities, and shared abstractions for Crypt.
//!
//! This crate provides foundational types used across all Crypt subsystems:
//! - Pose types (position + orientation)
//! - ID types (NodeId, LoadHandle)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod pose;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::pose::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generation() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
    }

    #[test]
    fn test_error_messages_name_the_area() {
        let err = SceneError::LoadFailure {
            area: "Dungeon1".into(),
        };
        assert!(err.to_string().contains("Dungeon1"));

        let err = TransitionError::RequestIgnored {
            requested: "Dungeon2".into(),
            in_flight: "Dungeon1".into(),
        };
        let text = err.to_string();
        assert!(text.contains("Dungeon2") && text.contains("Dungeon1"));
    }
}
