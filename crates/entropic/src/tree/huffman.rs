//! Huffman construction and depth balancing.
//!
//! The construction repeatedly merges the two lightest entries. Equal
//! weights are ordered by a sort key `(path, bin)`: `path` counts merges
//! since the entry's representative leaf and `bin` is that leaf's index.
//! The same key decides which of the two merged entries becomes the left
//! child, which keeps the result deterministic and the leaves of uniform
//! histograms in bin order.
//!
//! Weights are item counts. Comparing counts gives the same order as
//! comparing frequencies, without floating-point ties.

use entropic_core::logging::targets;
use entropic_core::PerfSpan;
use slotmap::SlotMap;

use super::{BinaryTree, NodeId, Tag, TreeNode};
use crate::bins::{self, Bins};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    path: usize,
    bin: usize,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    weight: usize,
    key: SortKey,
    node: NodeId,
}

impl BinaryTree {
    /// Build the balanced Huffman tree of a histogram.
    ///
    /// Every leaf of the result sits at depth
    /// `max(natural depth, required_depth)`. Nodes that encode a bin carry
    /// [`Tag::Genuine`]; nodes added beneath them carry [`Tag::Padding`].
    ///
    /// Fails with [`Error::EmptyHistogram`] if the histogram holds no items.
    pub fn huffman<B: Bins + ?Sized>(bins: &B, required_depth: Option<usize>) -> Result<Self> {
        Self::huffman_from_counts(&bins.counts(), required_depth)
    }

    /// Build the balanced Huffman tree of per-bin item counts.
    pub fn huffman_from_counts(counts: &[usize], required_depth: Option<usize>) -> Result<Self> {
        let _span = PerfSpan::new("huffman");
        let mut tree = Self::build_huffman(counts)?;
        let natural = tree.depth();
        let target = natural.max(required_depth.unwrap_or(0));
        tree.balance(target);
        tracing::debug!(
            target: targets::TREE,
            bins = counts.len(),
            natural,
            target,
            "huffman tree built"
        );
        Ok(tree)
    }

    /// Build the Huffman tree of a histogram without balancing it.
    ///
    /// The result has one leaf per bin.
    pub fn huffman_unbalanced<B: Bins + ?Sized>(bins: &B) -> Result<Self> {
        Self::build_huffman(&bins.counts())
    }

    fn build_huffman(counts: &[usize]) -> Result<Self> {
        // Merged weights never exceed this total.
        if bins::checked_total(counts)? == 0 {
            return Err(Error::EmptyHistogram);
        }

        let mut nodes: SlotMap<NodeId, TreeNode> = SlotMap::with_capacity_and_key(2 * counts.len());
        let mut entries: Vec<Entry> = counts
            .iter()
            .enumerate()
            .map(|(bin, &weight)| Entry {
                weight,
                key: SortKey { path: 0, bin },
                node: nodes.insert(TreeNode::leaf(Some(Tag::Genuine(bin)))),
            })
            .collect();

        let mut tree = Self::from_arena(nodes, entries[0].node);

        while entries.len() > 1 {
            // Heaviest first, so the two lightest are at the end.
            entries.sort_by(|x, y| y.weight.cmp(&x.weight).then(y.key.cmp(&x.key)));
            let (Some(a), Some(b)) = (entries.pop(), entries.pop()) else {
                break;
            };

            let a_after_b = match a.key.path.cmp(&b.key.path) {
                std::cmp::Ordering::Less => true,
                std::cmp::Ordering::Greater => false,
                std::cmp::Ordering::Equal => a.key.bin > b.key.bin,
            };
            let (left, right, key) = if a_after_b {
                (b, a, SortKey { path: a.key.path + 1, bin: a.key.bin })
            } else {
                (a, b, SortKey { path: b.key.path + 1, bin: b.key.bin })
            };

            let node = tree.push_internal(left.node, right.node, None);
            entries.push(Entry {
                weight: a.weight + b.weight,
                key,
                node,
            });
        }

        if let Some(last) = entries.first() {
            tree.root = last.node;
        }
        Ok(tree)
    }

    /// Pad every tagged leaf so that all leaves reach the given depth.
    ///
    /// A tagged leaf that is too shallow becomes a perfect subtree. It keeps
    /// its own tag and the nodes below it are tagged as padding of the same
    /// bin. Untagged leaves are left alone.
    pub fn balance(&mut self, target: usize) {
        self.tree_map(
            |tree, visit| {
                let remaining = target.saturating_sub(visit.layer + 1);
                if remaining <= 1 {
                    return;
                }
                if let Some((left, right)) = tree.children(visit.id) {
                    tree.pad_leaf(left, remaining);
                    tree.pad_leaf(right, remaining);
                }
            },
            |_, _| {},
        );

        // A one-bin tree has nothing above its root to pad it.
        let root = self.root;
        self.pad_leaf(root, target);
    }

    fn pad_leaf(&mut self, id: NodeId, depth: usize) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let (true, Some(tag)) = (node.is_leaf(), node.tag) {
            self.expand(id, depth, Some(tag.padding()));
        }
    }
}
