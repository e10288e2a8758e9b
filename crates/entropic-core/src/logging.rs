//! Logging facilities for Entropic.
//!
//! Entropic uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("entropic=debug,entropic_core=trace")
//!         .init();
//! }
//! ```
//!
//! Every subsystem logs to one of the targets in [`targets`], so filters
//! can select, say, only the Huffman construction.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "entropic_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "entropic_core::signal";
    /// Listener registration and notification target.
    pub const LISTENER: &str = "entropic_core::listener";
    /// Histogram and bins target.
    pub const BINS: &str = "entropic::bins";
    /// Matrix and slice target.
    pub const HEATMAP: &str = "entropic::heatmap";
    /// Binary tree construction target.
    pub const TREE: &str = "entropic::tree";
    /// Gaussian model target.
    pub const GAUSSIAN: &str = "entropic::gaussian";
    /// Performance spans target.
    pub const PERF: &str = "entropic::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations such as a tree
/// build.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "entropic::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("entropic::perf=info")
            .with_test_writer()
            .try_init();
        let _span = PerfSpan::new("test_operation");
        tracing::info!(target: targets::PERF, "inside span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::SIGNAL, targets::LISTENER] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::BINS, targets::HEATMAP, targets::TREE, targets::GAUSSIAN] {
            assert!(target.starts_with("entropic::"));
        }
    }
}
