//! Reactive models for entropy and optimal-transport diagrams.
//!
//! Entropic provides the small, observable data models behind a set of
//! interactive diagrams:
//!
//! - [`Histogram`]: bins of stacked items, edited one item at a time
//! - [`HeatMap`] and [`MatrixSlice`]: a square transport plan and its
//!   marginals, viewed as read-only histograms
//! - [`BinaryTree`]: perfect trees and depth-balanced Huffman trees built
//!   from a histogram
//! - [`Gaussian2D`]: a 2-D Gaussian with its principal axes
//!
//! Every model implements [`Model`]: listeners registered with
//! [`Model::add_listener`] are refreshed synchronously, in registration
//! order, after each mutation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use entropic::{BinaryTree, Bins, Histogram, Model};
//!
//! let hist = Arc::new(Histogram::from_array(&[1, 1, 1, 1]));
//!
//! let hist_clone = hist.clone();
//! hist.add_listener(Arc::new(move || {
//!     let tree = BinaryTree::huffman(&*hist_clone, None).unwrap();
//!     println!("tree depth is now {}", tree.depth());
//! }));
//!
//! hist.add_item(0).unwrap();
//! ```
//!
//! # Logging
//!
//! Models log through `tracing` under the targets listed in
//! [`entropic_core::logging::targets`].

pub mod bins;
pub mod datasets;
pub mod debug;
pub mod entropy;
mod error;
pub mod gaussian;
pub mod heatmap;
pub mod tree;

pub use bins::{Bins, Histogram, Item};
pub use error::{BinsOperation, Error, Result};
pub use gaussian::Gaussian2D;
pub use heatmap::{Cell, DelimitedTextOptions, HeatMap, Matrix, MatrixSlice, SliceMode, SliceScale};
pub use tree::{BinaryTree, NodeId, NodeKind, Tag, TreeNode, Visit};

pub use entropic_core::{Listener, ListenerId, Model, Notifier, RefreshGroup};
