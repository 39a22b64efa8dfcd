//! Port to the host engine's scene services.
//!
//! The lifecycle controller never touches engine state directly. Everything it
//! needs (asynchronous area loads, the node tree of a loaded area, the player
//! anchor) goes through [`SceneHost`].

use crypt_common::{LoadHandle, Pose};

use crate::area::Area;

/// The object carrying the player's tracked pose.
pub trait PlayerAnchor {
    /// Current world pose.
    fn pose(&self) -> Pose;

    /// Writes the world pose.
    fn set_pose(&mut self, pose: Pose);

    /// Enables or disables the movement/collision component.
    fn set_motion_enabled(&mut self, enabled: bool);

    /// Returns whether the movement/collision component is enabled.
    fn motion_enabled(&self) -> bool;
}

/// Moves the anchor with its movement component switched off.
///
/// The component is disabled for the pose write and enabled afterwards,
/// regardless of its state on entry.
pub fn teleport_anchor(anchor: &mut dyn PlayerAnchor, pose: Pose) {
    anchor.set_motion_enabled(false);
    anchor.set_pose(pose);
    anchor.set_motion_enabled(true);
}

/// Scene services provided by the host engine.
pub trait SceneHost {
    /// Starts loading an area additively, leaving loaded areas in place.
    /// `None` means the host refused to start.
    fn begin_load(&mut self, area: &str) -> Option<LoadHandle>;

    /// Starts unloading an area. `None` means the host refused to start.
    fn begin_unload(&mut self, area: &str) -> Option<LoadHandle>;

    /// Returns whether the operation behind a handle has finished.
    fn is_complete(&self, handle: LoadHandle) -> bool;

    /// Makes a loaded area the active one (lighting and instantiation scope).
    fn set_active_area(&mut self, area: &str);

    /// Returns the node tree of a loaded area.
    fn area(&self, name: &str) -> Option<&Area>;

    /// Returns the player anchor, if the host can find it.
    fn player_anchor(&mut self) -> Option<&mut dyn PlayerAnchor>;
}
