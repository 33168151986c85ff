//! Translation-only scene graph.
//!
//! Nodes store a position relative to their parent; world positions are
//! summed from the root on demand. Re-parenting preserves world position.
//! Nodes are never freed individually: a graph lives as long as the object
//! that owns it.

use glam::Vec3;
use lumen_core::{GfxError, GfxResult};

/// Index of a node within one [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw index.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Vec3,
}

/// A small arena of positioned nodes under a single root.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// The root node, always at the world origin.
    pub const ROOT: NodeId = NodeId(0);

    /// Creates a graph holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                local: Vec3::ZERO,
            }],
        }
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a node under `parent` at world position `world`.
    pub fn create_node(&mut self, parent: NodeId, world: Vec3) -> GfxResult<NodeId> {
        let parent_world = self.world_position(parent)?;
        let id = NodeId(u32::try_from(self.nodes.len()).map_err(|_| {
            GfxError::invalid("scene graph", "node limit reached")
        })?);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            local: world - parent_world,
        });
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Parent of a node (None for the root).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0 as usize).and_then(|n| n.parent)
    }

    /// Children of a node, in attach order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0 as usize)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// Position relative to the parent.
    pub fn local_position(&self, id: NodeId) -> GfxResult<Vec3> {
        Ok(self.node(id)?.local)
    }

    /// Position in world space.
    pub fn world_position(&self, id: NodeId) -> GfxResult<Vec3> {
        let mut sum = Vec3::ZERO;
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = self.node(cur)?;
            sum += node.local;
            current = node.parent;
        }
        Ok(sum)
    }

    /// Moves a node to a world position. Its descendants move with it.
    pub fn set_world_position(&mut self, id: NodeId, world: Vec3) -> GfxResult<()> {
        let parent_world = match self.node(id)?.parent {
            Some(parent) => self.world_position(parent)?,
            None => return Err(GfxError::invalid("node", "the root cannot move")),
        };
        self.node_mut(id)?.local = world - parent_world;
        Ok(())
    }

    /// Moves a node by a world-space delta.
    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> GfxResult<()> {
        let world = self.world_position(id)?;
        self.set_world_position(id, world + delta)
    }

    /// Re-parents `id` under `parent`, keeping its world position.
    pub fn attach(&mut self, id: NodeId, parent: NodeId) -> GfxResult<()> {
        if id == Self::ROOT {
            return Err(GfxError::invalid("node", "the root cannot be re-parented"));
        }
        if self.is_ancestor_or_self(id, parent) {
            return Err(GfxError::invalid(
                "node",
                "a node cannot be attached inside its own subtree",
            ));
        }

        let world = self.world_position(id)?;
        let parent_world = self.world_position(parent)?;

        let old_parent = self.node(id)?.parent;
        if let Some(old) = old_parent {
            self.node_mut(old)?.children.retain(|&c| c != id);
        }
        self.node_mut(parent)?.children.push(id);
        let node = self.node_mut(id)?;
        node.parent = Some(parent);
        node.local = world - parent_world;
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.parent(cur);
        }
        false
    }

    fn node(&self, id: NodeId) -> GfxResult<&Node> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| GfxError::invalid("node", format!("no node #{}", id.0)))
    }

    fn node_mut(&mut self, id: NodeId) -> GfxResult<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or_else(|| GfxError::invalid("node", format!("no node #{}", id.0)))
    }
}
