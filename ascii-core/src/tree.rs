use crate::{geometry::Point, types::NodeId};
use std::f64::consts::PI;

/// One segment/junction of a generated tree.
#[derive(Debug, Clone)]
pub struct BranchNode {
    pub position: Point,
    pub thickness: f64,
    /// Growth direction in radians.
    pub orientation: f64,
    /// Distance from the root in generations; the root is 0.
    pub depth: usize,
    pub children: Vec<NodeId>,
}

/// Arena of branch nodes. Node 0 is the root; every other node is owned
/// by exactly one parent through its `children` list.
#[derive(Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<BranchNode>,
}

impl BranchNode {
    pub fn new_root(position: Point, thickness: f64, orientation: f64) -> Self {
        Self {
            position,
            thickness,
            orientation,
            depth: 0,
            children: Vec::with_capacity(4),
        }
    }

    pub fn new_child(position: Point, thickness: f64, orientation: f64, depth: usize) -> Self {
        Self {
            position,
            thickness,
            orientation,
            depth,
            children: Vec::with_capacity(4),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for BranchNode {
    /// Root at the origin with thickness `1.0`, pointing at `pi`.
    fn default() -> Self {
        Self::new_root(Point::new(0.0, 0.0), 1.0, PI)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self {
            nodes: vec![BranchNode::default()],
        }
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root: BranchNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> &BranchNode {
        &self.nodes[Self::ROOT]
    }

    /// Appends a child under `parent` and returns its id.
    ///
    /// ### Panics
    /// Panics if `parent` is not a node of this tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        position: Point,
        thickness: f64,
        orientation: f64,
    ) -> NodeId {
        let id: usize = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes
            .push(BranchNode::new_child(position, thickness, orientation, depth));
        self.nodes[parent].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Deepest generation present, `0` for a lone root.
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tree_is_a_lone_root() {
        let tree = Tree::default();
        assert_eq!(tree.len(), 1);
        let root = tree.root();
        assert_eq!(root.position, Point::new(0.0, 0.0));
        assert_eq!(root.thickness, 1.0);
        assert_eq!(root.orientation, PI);
        assert!(root.is_leaf());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn add_child_links_parent_and_tracks_depth() {
        let mut tree = Tree::default();
        let a = tree.add_child(Tree::ROOT, Point::new(-1.0, 0.0), 0.5, PI);
        let b = tree.add_child(a, Point::new(-2.0, 0.0), 0.25, PI);
        let c = tree.add_child(Tree::ROOT, Point::new(-1.0, 1.0), 0.5, PI / 2.0);

        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(tree.nodes[0].children, vec![a, c]);
        assert_eq!(tree.nodes[a].children, vec![b]);
        assert_eq!(tree.nodes[b].depth, 2);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaf_count(), 2);
    }
}
