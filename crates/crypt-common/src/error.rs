//! Error types for Crypt.

use thiserror::Error;

/// Errors returned when asking the lifecycle controller for a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A transition is already running; the request was dropped.
    #[error("Transition to '{requested}' ignored: transition to '{in_flight}' in progress")]
    RequestIgnored {
        /// Area that was requested
        requested: String,
        /// Area of the transition currently running
        in_flight: String,
    },
}

/// Failures raised while a transition talks to the scene host.
///
/// None of these escape a transition; they are logged and reported in the
/// transition outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Host returned no load handle
    #[error("Failed to start loading area '{area}'")]
    LoadFailure {
        /// Area name
        area: String,
    },

    /// Host returned no unload handle
    #[error("Failed to start unloading area '{area}'")]
    UnloadFailure {
        /// Area name
        area: String,
    },

    /// Player anchor could not be located
    #[error("Player anchor not found")]
    AnchorNotFound,

    /// Host reported a load as complete but has no such area
    #[error("Area '{area}' is not loaded")]
    AreaMissing {
        /// Area name
        area: String,
    },
}

/// Errors loading authored area data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be parsed
    #[error("Failed to parse area catalog: {0}")]
    Parse(String),

    /// Two blueprints share a name
    #[error("Duplicate area '{0}' in catalog")]
    DuplicateArea(String),

    /// IO error reading the catalog
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
