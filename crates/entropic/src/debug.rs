//! Debug rendering of binary trees.
//!
//! ```
//! use entropic::BinaryTree;
//! use entropic::debug::TreeDebug;
//!
//! let tree = BinaryTree::huffman_from_counts(&[1, 1, 2], None).unwrap();
//! println!("{}", TreeDebug::new().format(&tree));
//! ```
//!
//! prints
//!
//! ```text
//! node
//! ├── node
//! │   ├── leaf [0]
//! │   └── leaf [1]
//! └── node [2]
//!     ├── leaf [c2]
//!     └── leaf [c2]
//! ```
//!
//! The heavier bin 2 sits one layer higher, so balancing pads it with two
//! `c2` leaves.

use std::fmt;

use crate::tree::{BinaryTree, NodeId};

/// Connector characters used to draw the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

impl TreeStyle {
    /// `(continuation, branch, last branch, blank)` for this style.
    fn connectors(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::Ascii => ("|   ", "+-- ", "`-- ", "    "),
            Self::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} ", "    "),
            Self::Compact => ("  ", "- ", "- ", "  "),
        }
    }
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node tags.
    pub show_tags: bool,
    /// Whether to show each node's leaf count and depth.
    pub show_sizes: bool,
    /// Deepest layer to print (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_tags: true,
            show_sizes: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Options that print everything.
    pub fn detailed() -> Self {
        Self {
            show_sizes: true,
            ..Default::default()
        }
    }

    /// Options that print only the shape.
    pub fn minimal() -> Self {
        Self {
            show_tags: false,
            show_sizes: false,
            ..Default::default()
        }
    }
}

/// Renders a [`BinaryTree`] as indented text.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Render a whole tree.
    pub fn format(&self, tree: &BinaryTree) -> String {
        self.format_subtree(tree, tree.root())
    }

    /// Render the subtree below `root`.
    pub fn format_subtree(&self, tree: &BinaryTree, root: NodeId) -> String {
        Subtree {
            debug: self,
            tree,
            root,
        }
        .to_string()
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        tree: &BinaryTree,
        id: NodeId,
        path: &mut Vec<bool>,
    ) -> fmt::Result {
        let Some(node) = tree.node(id) else {
            return Ok(());
        };
        let layer = path.len();
        if self.options.max_depth.is_some_and(|max| layer > max) {
            return Ok(());
        }

        let (continuation, branch, last_branch, blank) = self.options.style.connectors();
        if let Some((&is_last, ancestors)) = path.split_last() {
            for &ancestor_last in ancestors {
                f.write_str(if ancestor_last { blank } else { continuation })?;
            }
            f.write_str(if is_last { last_branch } else { branch })?;
        }

        f.write_str(if node.is_leaf() { "leaf" } else { "node" })?;
        if self.options.show_tags {
            if let Some(tag) = node.tag() {
                write!(f, " [{tag}]")?;
            }
        }
        if self.options.show_sizes {
            write!(f, " (leaves={}, depth={})", node.num_leaves(), node.depth())?;
        }
        writeln!(f)?;

        if let Some((left, right)) = node.children() {
            for (child, is_last) in [(left, false), (right, true)] {
                path.push(is_last);
                self.write_node(f, tree, child, path)?;
                path.pop();
            }
        }
        Ok(())
    }
}

struct Subtree<'a> {
    debug: &'a TreeDebug,
    tree: &'a BinaryTree,
    root: NodeId,
}

impl fmt::Display for Subtree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.debug
            .write_node(f, self.tree, self.root, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tag;

    #[test]
    fn test_format_single() {
        let tree = BinaryTree::leaf(Some(Tag::Padding(2)));
        assert_eq!(TreeDebug::new().format(&tree), "leaf [c2]\n");
    }

    #[test]
    fn test_format_unicode() {
        let tree = BinaryTree::huffman_from_counts(&[1, 1, 2], None).unwrap();
        let expected = "node\n\
                        \u{251c}\u{2500}\u{2500} node\n\
                        \u{2502}   \u{251c}\u{2500}\u{2500} leaf [0]\n\
                        \u{2502}   \u{2514}\u{2500}\u{2500} leaf [1]\n\
                        \u{2514}\u{2500}\u{2500} node [2]\n    \
                        \u{251c}\u{2500}\u{2500} leaf [c2]\n    \
                        \u{2514}\u{2500}\u{2500} leaf [c2]\n";
        assert_eq!(TreeDebug::new().format(&tree), expected);
    }

    #[test]
    fn test_format_unbalanced() {
        let hist = crate::bins::Histogram::from_array(&[1, 1, 2]);
        let tree = BinaryTree::huffman_unbalanced(&hist).unwrap();
        let expected = "node\n\
                        \u{251c}\u{2500}\u{2500} node\n\
                        \u{2502}   \u{251c}\u{2500}\u{2500} leaf [0]\n\
                        \u{2502}   \u{2514}\u{2500}\u{2500} leaf [1]\n\
                        \u{2514}\u{2500}\u{2500} leaf [2]\n";
        assert_eq!(TreeDebug::new().format(&tree), expected);
    }

    #[test]
    fn test_format_ascii_minimal() {
        let tree = BinaryTree::full(3);
        let options = TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        };
        let expected = "node\n\
                        +-- node\n\
                        |   +-- leaf\n\
                        |   `-- leaf\n\
                        `-- node\n    \
                        +-- leaf\n    \
                        `-- leaf\n";
        assert_eq!(TreeDebug::with_options(options).format(&tree), expected);
    }

    #[test]
    fn test_format_detailed_max_depth() {
        let tree = BinaryTree::full(3);
        let options = TreeFormatOptions {
            style: TreeStyle::Compact,
            max_depth: Some(1),
            ..TreeFormatOptions::detailed()
        };
        let output = TreeDebug::with_options(options).format(&tree);
        assert_eq!(
            output,
            "node (leaves=4, depth=3)\n- node (leaves=2, depth=2)\n- node (leaves=2, depth=2)\n"
        );
    }

    #[test]
    fn test_format_subtree() {
        let tree = BinaryTree::full(2);
        let (_, right) = tree.children(tree.root()).unwrap();
        assert_eq!(TreeDebug::new().format_subtree(&tree, right), "leaf\n");
    }
}
