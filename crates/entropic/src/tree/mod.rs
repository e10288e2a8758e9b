//! Binary trees.
//!
//! A [`BinaryTree`] stores its nodes in an arena addressed by [`NodeId`].
//! Every internal node has exactly two children; each node caches its leaf
//! count and depth, which [`BinaryTree::tree_map`] recomputes bottom-up as it
//! walks the tree.
//!
//! Trees are built either as perfect trees ([`BinaryTree::full`]) or from a
//! histogram with the Huffman construction in [`huffman`](BinaryTree::huffman).
//! Leaves of a Huffman tree carry a [`Tag`] naming the bin they encode.
//!
//! # Depth and layers
//!
//! A single leaf has depth 1. Layer 0 is the root, layer 1 its children, and
//! so on, so the leaves of a perfect tree of depth `d` sit on layer `d - 1`.

mod huffman;

use std::fmt;
use std::sync::Arc;

use entropic_core::{Listener, ListenerId, Model, Notifier};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier of a node in a [`BinaryTree`].
    pub struct NodeId;
}

/// The bin a tree node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The node encodes this bin.
    Genuine(usize),
    /// The node was added under a genuine node of this bin to even out depths.
    Padding(usize),
}

impl Tag {
    /// The bin this tag refers to.
    pub fn bin(&self) -> usize {
        match *self {
            Self::Genuine(bin) | Self::Padding(bin) => bin,
        }
    }

    /// Returns `true` for a genuine tag.
    pub fn is_genuine(&self) -> bool {
        matches!(self, Self::Genuine(_))
    }

    /// The padding tag for the same bin.
    pub fn padding(&self) -> Self {
        Self::Padding(self.bin())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genuine(bin) => write!(f, "{bin}"),
            Self::Padding(bin) => write!(f, "c{bin}"),
        }
    }
}

/// Whether a node is a leaf or has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A terminal node.
    Leaf,
    /// A node with exactly two children.
    Internal { left: NodeId, right: NodeId },
}

/// A node of a [`BinaryTree`].
#[derive(Debug, Clone)]
pub struct TreeNode {
    kind: NodeKind,
    tag: Option<Tag>,
    num_leaves: usize,
    depth: usize,
}

impl TreeNode {
    fn leaf(tag: Option<Tag>) -> Self {
        Self {
            kind: NodeKind::Leaf,
            tag,
            num_leaves: 1,
            depth: 1,
        }
    }

    /// Leaf or internal.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    /// The left and right children of an internal node.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { left, right } => Some((left, right)),
        }
    }

    /// The node's tag.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// Number of leaves below (and including) this node.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Depth of the subtree rooted here. A leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Position of a node during a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// The visited node.
    pub id: NodeId,
    /// Layer of the node relative to the traversal root.
    pub layer: usize,
    /// Heap index of the node within its layer: children of index `k` are
    /// `2k` and `2k + 1`.
    pub index: usize,
}

/// A binary tree model.
pub struct BinaryTree {
    nodes: SlotMap<NodeId, TreeNode>,
    root: NodeId,
    notifier: Notifier,
}

impl BinaryTree {
    /// A tree made of a single leaf.
    pub fn leaf(tag: Option<Tag>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode::leaf(tag));
        Self::from_arena(nodes, root)
    }

    /// A perfect tree of the given depth with untagged nodes.
    ///
    /// A depth of 0 or 1 gives a single leaf.
    pub fn full(depth: usize) -> Self {
        let mut tree = Self::leaf(None);
        let root = tree.root;
        tree.expand(root, depth, None);
        tree
    }

    fn from_arena(nodes: SlotMap<NodeId, TreeNode>, root: NodeId) -> Self {
        Self {
            nodes,
            root,
            notifier: Notifier::new("tree"),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// The children of a node, if it is internal.
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes.get(id)?.children()
    }

    /// The tag of a node.
    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.nodes.get(id)?.tag
    }

    /// Set the tag of a node. Unknown ids are ignored.
    pub fn set_tag(&mut self, id: NodeId, tag: Option<Tag>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.tag = tag;
        }
    }

    /// Number of leaves in the tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.get(self.root).map_or(0, TreeNode::num_leaves)
    }

    /// Depth of the tree.
    pub fn depth(&self) -> usize {
        self.nodes.get(self.root).map_or(0, TreeNode::depth)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.post_order(self.root).len()
    }

    /// All nodes on layer `n` below the root, left to right.
    pub fn layer(&self, n: usize) -> Vec<NodeId> {
        self.layer_from(self.root, n)
    }

    /// All nodes on layer `n` below `id`, left to right.
    pub fn layer_from(&self, id: NodeId, n: usize) -> Vec<NodeId> {
        let mut current = vec![id];
        for _ in 0..n {
            current = current
                .iter()
                .filter_map(|&id| self.children(id))
                .flat_map(|(left, right)| [left, right])
                .collect();
        }
        current
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.post_order(self.root)
            .into_iter()
            .map(|visit| visit.id)
            .filter(|&id| self.nodes.get(id).is_some_and(TreeNode::is_leaf))
            .collect()
    }

    /// Tags of the leaves from left to right.
    pub fn leaf_tags(&self) -> Vec<Option<Tag>> {
        self.leaves().into_iter().map(|id| self.tag(id)).collect()
    }

    /// The layer of each genuine tag, as `(bin, layer)` pairs sorted by bin.
    ///
    /// For a Huffman tree this is the code length assigned to each bin.
    pub fn code_lengths(&self) -> Vec<(usize, usize)> {
        let mut lengths: Vec<(usize, usize)> = self
            .post_order(self.root)
            .into_iter()
            .filter_map(|visit| match self.tag(visit.id) {
                Some(Tag::Genuine(bin)) => Some((bin, visit.layer)),
                _ => None,
            })
            .collect();
        lengths.sort_unstable();
        lengths
    }

    /// Walk the tree in post-order (left, right, self) without modifying it.
    pub fn visit(&self, mut f: impl FnMut(&TreeNode, Visit)) {
        for visit in self.post_order(self.root) {
            if let Some(node) = self.nodes.get(visit.id) {
                f(node, visit);
            }
        }
    }

    /// Walk the tree in post-order, calling `node_fn` on internal nodes and
    /// `leaf_fn` on leaves.
    ///
    /// Both callbacks may modify the tree, for example to expand a child of
    /// the visited node. Nodes added during the walk are not visited. Each
    /// internal node's leaf count and depth are recomputed right after its
    /// callback runs.
    pub fn tree_map(
        &mut self,
        mut node_fn: impl FnMut(&mut Self, Visit),
        mut leaf_fn: impl FnMut(&mut Self, Visit),
    ) {
        for visit in self.post_order(self.root) {
            match self.nodes.get(visit.id).map(TreeNode::is_leaf) {
                Some(true) => leaf_fn(&mut *self, visit),
                Some(false) => {
                    node_fn(&mut *self, visit);
                    self.update(visit.id);
                }
                None => {}
            }
        }
    }

    /// Turn a leaf into a perfect subtree of the given depth.
    ///
    /// The leaf keeps its own tag; every added node gets `tag`. Does nothing
    /// for internal nodes or a depth of 1 or less.
    pub fn expand(&mut self, id: NodeId, depth: usize, tag: Option<Tag>) {
        if depth <= 1 || !self.nodes.get(id).is_some_and(TreeNode::is_leaf) {
            return;
        }
        let left = self.push_full(depth - 1, tag);
        let right = self.push_full(depth - 1, tag);
        if let Some(node) = self.nodes.get_mut(id) {
            node.kind = NodeKind::Internal { left, right };
        }
        self.update(id);
    }

    fn push_full(&mut self, depth: usize, tag: Option<Tag>) -> NodeId {
        if depth <= 1 {
            return self.nodes.insert(TreeNode::leaf(tag));
        }
        let left = self.push_full(depth - 1, tag);
        let right = self.push_full(depth - 1, tag);
        self.push_internal(left, right, tag)
    }

    fn push_internal(&mut self, left: NodeId, right: NodeId, tag: Option<Tag>) -> NodeId {
        let id = self.nodes.insert(TreeNode {
            kind: NodeKind::Internal { left, right },
            tag,
            num_leaves: 0,
            depth: 0,
        });
        self.update(id);
        id
    }

    /// Recompute a node's cached state from its children.
    fn update(&mut self, id: NodeId) {
        let Some((left, right)) = self.children(id) else {
            return;
        };
        let (Some(l), Some(r)) = (self.nodes.get(left), self.nodes.get(right)) else {
            return;
        };
        let num_leaves = l.num_leaves + r.num_leaves;
        let depth = 1 + l.depth.max(r.depth);
        if let Some(node) = self.nodes.get_mut(id) {
            node.num_leaves = num_leaves;
            node.depth = depth;
        }
    }

    fn post_order(&self, root: NodeId) -> Vec<Visit> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.collect_post_order(
            Visit {
                id: root,
                layer: 0,
                index: 0,
            },
            &mut order,
        );
        order
    }

    fn collect_post_order(&self, visit: Visit, order: &mut Vec<Visit>) {
        if let Some((left, right)) = self.children(visit.id) {
            let layer = visit.layer + 1;
            self.collect_post_order(
                Visit {
                    id: left,
                    layer,
                    index: 2 * visit.index,
                },
                order,
            );
            self.collect_post_order(
                Visit {
                    id: right,
                    layer,
                    index: 2 * visit.index + 1,
                },
                order,
            );
        }
        order.push(visit);
    }

    fn same_shape(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        let (Some(x), Some(y)) = (self.nodes.get(a), other.nodes.get(b)) else {
            return false;
        };
        if x.tag != y.tag {
            return false;
        }
        match (x.kind, y.kind) {
            (NodeKind::Leaf, NodeKind::Leaf) => true,
            (
                NodeKind::Internal { left: xl, right: xr },
                NodeKind::Internal { left: yl, right: yr },
            ) => self.same_shape(xl, other, yl) && self.same_shape(xr, other, yr),
            _ => false,
        }
    }
}

/// Trees are equal when they have the same shape and the same tags in the
/// same places.
impl PartialEq for BinaryTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(self.root, other, other.root)
    }
}

impl Eq for BinaryTree {}

impl fmt::Debug for BinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTree")
            .field("num_leaves", &self.num_leaves())
            .field("depth", &self.depth())
            .field("leaf_tags", &self.leaf_tags())
            .finish()
    }
}

impl Default for BinaryTree {
    fn default() -> Self {
        Self::leaf(None)
    }
}

impl Model for BinaryTree {
    fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        self.notifier.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> entropic_core::Result<()> {
        self.notifier.remove_listener(id)
    }

    fn refresh(&self) {
        self.notifier.notify();
    }
}

static_assertions::assert_impl_all!(BinaryTree: Send, Sync);
