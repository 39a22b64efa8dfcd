//! Spawn marker lookup.
//!
//! Areas mark where the player should appear with specially named nodes.
//! The locator walks an area's trees depth-first, pre-order, root by root,
//! and returns the first node whose name matches the spawn vocabulary.

use crypt_common::{NodeId, Pose};
use serde::{Deserialize, Serialize};

use crate::area::{Area, SceneNode};

/// Substrings that mark a spawn node (matched against the lower-cased name).
pub const DEFAULT_CONTAINS_PATTERNS: [&str; 2] = ["playerspawn", "dungeonspawn"];

/// Names that mark a spawn node only on an exact (case-insensitive) match.
pub const DEFAULT_EXACT_NAMES: [&str; 1] = ["spawnpoint"];

/// Name vocabulary accepted as spawn markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPatterns {
    contains: Vec<String>,
    exact: Vec<String>,
}

impl Default for SpawnPatterns {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINS_PATTERNS, DEFAULT_EXACT_NAMES)
    }
}

impl SpawnPatterns {
    /// Creates a vocabulary; patterns are stored lower-cased.
    #[must_use]
    pub fn new<C, E>(contains: C, exact: E) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            contains: contains
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
            exact: exact.into_iter().map(|p| p.as_ref().to_lowercase()).collect(),
        }
    }

    /// Returns whether a node name qualifies as a spawn marker.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        self.contains.iter().any(|p| folded.contains(p.as_str()))
            || self.exact.iter().any(|p| folded == *p)
    }
}

/// A spawn marker found in an area.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnMarker {
    /// Node the marker came from
    pub node: NodeId,
    /// Node name as authored
    pub name: String,
    /// Where the player anchor should be placed
    pub pose: Pose,
}

impl From<&SceneNode> for SpawnMarker {
    fn from(node: &SceneNode) -> Self {
        Self {
            node: node.id(),
            name: node.name().to_owned(),
            pose: node.pose(),
        }
    }
}

/// Finds spawn markers in loaded areas.
#[derive(Debug, Clone, Default)]
pub struct SpawnLocator {
    patterns: SpawnPatterns,
}

impl SpawnLocator {
    /// Creates a locator with the default vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a locator with a custom vocabulary.
    #[must_use]
    pub fn with_patterns(patterns: SpawnPatterns) -> Self {
        Self { patterns }
    }

    /// Returns the vocabulary in use.
    #[must_use]
    pub fn patterns(&self) -> &SpawnPatterns {
        &self.patterns
    }

    /// Returns whether a node name qualifies as a spawn marker.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.matches(name)
    }

    /// Returns the first spawn marker in traversal order, if any.
    ///
    /// Roots are visited in stored order, each subtree depth-first pre-order.
    /// A marker nested under an earlier root wins over a later root.
    #[must_use]
    pub fn find_spawn_marker(&self, area: &Area) -> Option<SpawnMarker> {
        area.nodes()
            .find(|node| self.matches(node.name()))
            .map(SpawnMarker::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use proptest::prelude::*;

    fn leaf(name: &str) -> SceneNode {
        SceneNode::new(name, Pose::default())
    }

    #[test]
    fn test_default_vocabulary() {
        let locator = SpawnLocator::new();
        assert!(locator.matches("PlayerSpawn"));
        assert!(locator.matches("Room_PLAYERSPAWN_01"));
        assert!(locator.matches("dungeonSpawn"));
        assert!(locator.matches("SpawnPoint"));
        assert!(locator.matches("SPAWNPOINT"));

        // "spawnpoint" must be exact
        assert!(!locator.matches("SpawnPoint (1)"));
        assert!(!locator.matches("EnemySpawnPoint"));
        assert!(!locator.matches("Spawn"));
        assert!(!locator.matches(""));
    }

    #[test]
    fn test_find_in_nested_child() {
        let pose = Pose::new(Vec3::new(4.0, 0.0, -2.0), Quat::from_rotation_y(1.0));
        let area = Area::new("Dungeon1").with_root(
            leaf("Rooms").with_child(
                leaf("Entrance").with_child(SceneNode::new("PlayerSpawn", pose)),
            ),
        );

        let marker = SpawnLocator::new()
            .find_spawn_marker(&area)
            .expect("marker should be found");
        assert_eq!(marker.name, "PlayerSpawn");
        assert_eq!(marker.pose, pose);
    }

    #[test]
    fn test_none_when_absent() {
        let area = Area::new("Dungeon1")
            .with_root(leaf("Walls").with_child(leaf("EnemySpawnPoint")))
            .with_root(leaf("Lights"));
        assert!(SpawnLocator::new().find_spawn_marker(&area).is_none());
        assert!(SpawnLocator::new().find_spawn_marker(&Area::new("Empty")).is_none());
    }

    #[test]
    fn test_tie_break_follows_traversal_order() {
        // Pre-order: a parent beats its children, an earlier sibling's
        // subtree beats a later sibling, an earlier root beats a later root.
        let area = Area::new("Ties")
            .with_root(
                leaf("First")
                    .with_child(leaf("Deep").with_child(leaf("DungeonSpawn_A")))
                    .with_child(leaf("PlayerSpawn_B")),
            )
            .with_root(leaf("SpawnPoint"));

        let marker = SpawnLocator::new()
            .find_spawn_marker(&area)
            .expect("marker should be found");
        assert_eq!(marker.name, "DungeonSpawn_A");
    }

    #[test]
    fn test_matching_parent_wins_over_child() {
        let area = Area::new("Nested")
            .with_root(leaf("PlayerSpawnGroup").with_child(leaf("PlayerSpawn")));
        let marker = SpawnLocator::new()
            .find_spawn_marker(&area)
            .expect("marker should be found");
        assert_eq!(marker.name, "PlayerSpawnGroup");
    }

    #[test]
    fn test_custom_patterns() {
        let locator = SpawnLocator::with_patterns(SpawnPatterns::new(["Arrival"], ["START"]));
        assert!(locator.matches("boat_arrival"));
        assert!(locator.matches("start"));
        assert!(!locator.matches("PlayerSpawn"));
    }

    fn name_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("PlayerSpawn".to_string()),
            Just("dungeonspawn_2".to_string()),
            Just("SpawnPoint".to_string()),
            Just("SpawnPoint2".to_string()),
            "[a-zA-Z]{1,8}",
        ]
    }

    fn tree_strategy() -> impl Strategy<Value = SceneNode> {
        let leaf = name_strategy().prop_map(|name| SceneNode::new(name, Pose::default()));
        leaf.prop_recursive(4, 32, 4, |inner| {
            (name_strategy(), prop::collection::vec(inner, 0..4)).prop_map(|(name, children)| {
                children
                    .into_iter()
                    .fold(SceneNode::new(name, Pose::default()), SceneNode::with_child)
            })
        })
    }

    fn first_match_recursive<'a>(
        node: &'a SceneNode,
        locator: &SpawnLocator,
    ) -> Option<&'a SceneNode> {
        if locator.matches(node.name()) {
            return Some(node);
        }
        node.children()
            .iter()
            .find_map(|child| first_match_recursive(child, locator))
    }

    proptest! {
        #[test]
        fn prop_locator_agrees_with_recursive_search(
            roots in prop::collection::vec(tree_strategy(), 0..4)
        ) {
            let area = roots.into_iter().fold(Area::new("Generated"), Area::with_root);
            let locator = SpawnLocator::new();

            let expected = area
                .roots()
                .iter()
                .find_map(|root| first_match_recursive(root, &locator))
                .map(SceneNode::id);
            let found = locator.find_spawn_marker(&area).map(|m| m.node);

            prop_assert_eq!(found, expected);
        }
    }
}
