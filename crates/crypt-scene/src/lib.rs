//! # Crypt Scene
//!
//! Area lifecycle for Crypt.
//!
//! This crate provides the engine-independent core of area transitions:
//! - Areas and their node trees
//! - Spawn marker lookup
//! - The lifecycle controller (fade, load, spawn, unload) as a per-frame state machine
//! - The scene host port the controller drives, plus an in-memory host
//! - Authored area catalogs (RON)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod area;
pub mod catalog;
pub mod fade;
pub mod host;
pub mod lifecycle;
pub mod memory_host;
pub mod requests;
pub mod spawn;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::area::*;
    pub use crate::catalog::*;
    pub use crate::fade::*;
    pub use crate::host::*;
    pub use crate::lifecycle::*;
    pub use crate::memory_host::*;
    pub use crate::requests::*;
    pub use crate::spawn::*;
}

pub use prelude::*;
