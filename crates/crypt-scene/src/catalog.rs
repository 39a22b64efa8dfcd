//! Authored area blueprints.
//!
//! Areas are authored in RON as a list of blueprints:
//!
//! ```ron
//! [
//!     (
//!         name: "Dungeon1",
//!         roots: [
//!             (name: "Entrance", children: [
//!                 (name: "PlayerSpawn", position: (0.0, 0.0, 4.0), rotation: (180.0, 0.0, 0.0)),
//!             ]),
//!         ],
//!     ),
//! ]
//! ```
//!
//! `rotation` is yaw, pitch, roll in degrees. Every instantiation mints fresh
//! node IDs, so a reloaded area never shares IDs with its previous copy.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use crypt_common::{CatalogError, Pose};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::area::{Area, SceneNode};

/// Authored description of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBlueprint {
    /// Node name
    pub name: String,
    /// World position
    #[serde(default)]
    pub position: (f32, f32, f32),
    /// Yaw, pitch, roll in degrees
    #[serde(default)]
    pub rotation: (f32, f32, f32),
    /// Child nodes
    #[serde(default)]
    pub children: Vec<NodeBlueprint>,
}

impl NodeBlueprint {
    /// Creates a blueprint at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: (0.0, 0.0, 0.0),
            rotation: (0.0, 0.0, 0.0),
            children: Vec::new(),
        }
    }

    /// World pose described by this blueprint.
    #[must_use]
    pub fn pose(&self) -> Pose {
        let (x, y, z) = self.position;
        let (yaw, pitch, roll) = self.rotation;
        Pose::from_euler_degrees(Vec3::new(x, y, z), yaw, pitch, roll)
    }

    fn instantiate(&self) -> SceneNode {
        self.children
            .iter()
            .fold(SceneNode::new(&self.name, self.pose()), |node, child| {
                node.with_child(child.instantiate())
            })
    }
}

/// Authored description of an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBlueprint {
    /// Area name
    pub name: String,
    /// Root nodes in enumeration order
    #[serde(default)]
    pub roots: Vec<NodeBlueprint>,
}

impl AreaBlueprint {
    /// Builds a live area with fresh node IDs.
    #[must_use]
    pub fn instantiate(&self) -> Area {
        self.roots
            .iter()
            .fold(Area::new(&self.name), |area, root| {
                area.with_root(root.instantiate())
            })
    }
}

/// Area blueprints by name.
#[derive(Debug, Clone, Default)]
pub struct AreaCatalog {
    areas: AHashMap<String, AreaBlueprint>,
}

impl AreaCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, CatalogError> {
        let blueprints: Vec<AreaBlueprint> =
            ron::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let mut catalog = Self::new();
        for blueprint in blueprints {
            catalog.insert(blueprint)?;
        }
        Ok(catalog)
    }

    /// Loads a catalog from a RON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_ron_str(&text)?;
        info!(areas = catalog.len(), "Loaded area catalog from {}", path.display());
        Ok(catalog)
    }

    /// Adds a blueprint. Names must be unique.
    pub fn insert(&mut self, blueprint: AreaBlueprint) -> Result<(), CatalogError> {
        if self.areas.contains_key(&blueprint.name) {
            return Err(CatalogError::DuplicateArea(blueprint.name));
        }
        self.areas.insert(blueprint.name.clone(), blueprint);
        Ok(())
    }

    /// Returns a blueprint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AreaBlueprint> {
        self.areas.get(name)
    }

    /// Whether an area with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.areas.contains_key(name)
    }

    /// Builds a live area from its blueprint.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Area> {
        self.get(name).map(AreaBlueprint::instantiate)
    }

    /// Area names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.areas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of blueprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
