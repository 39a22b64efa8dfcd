//! Areas and their node trees.
//!
//! An [`Area`] is a named content region holding an ordered list of root
//! [`SceneNode`]s. Trees are owned top-down and carry no parent links, so they
//! are acyclic by construction.

use crypt_common::{NodeId, Pose};

/// A named node in an area's tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    pose: Pose,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates a leaf node with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            pose,
            children: Vec::new(),
        }
    }

    /// Adds a child and returns self (builder style).
    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child.
    pub fn push_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Returns the node ID.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the world pose.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns the children in stored order.
    #[must_use]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Iterates this node and its descendants in depth-first pre-order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }
}

/// Depth-first pre-order iterator over one or more trees.
///
/// Siblings are visited in stored order.
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A loaded content region.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    name: String,
    roots: Vec<SceneNode>,
}

impl Area {
    /// Creates an empty area.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roots: Vec::new(),
        }
    }

    /// Adds a root node and returns self (builder style).
    #[must_use]
    pub fn with_root(mut self, root: SceneNode) -> Self {
        self.roots.push(root);
        self
    }

    /// Appends a root node.
    pub fn push_root(&mut self, root: SceneNode) {
        self.roots.push(root);
    }

    /// Returns the area name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the root nodes in stored order.
    #[must_use]
    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    /// Iterates every node, root by root, each in depth-first pre-order.
    pub fn nodes(&self) -> Preorder<'_> {
        Preorder {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Returns the total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Finds a node by ID.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes().find(|node| node.id == id)
    }
}
