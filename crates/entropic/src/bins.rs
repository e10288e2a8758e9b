//! Bins and histograms.
//!
//! A [`Histogram`] is an ordered sequence of bins, each an ordered stack of
//! [`Item`]s. Every item knows its own position: `x` is the bin it sits in
//! and `y` its height in the stack, so views can lay items out on a grid
//! without further bookkeeping.
//!
//! The [`Bins`] trait is the read/write surface views program against. It is
//! implemented by [`Histogram`] and by the read-only
//! [`MatrixSlice`](crate::heatmap::MatrixSlice), so any histogram view can
//! also display a projection of a matrix.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use entropic::{Bins, Histogram, Model};
//!
//! let hist = Histogram::from_array(&[1, 2, 4]);
//! hist.add_listener(Arc::new(|| println!("histogram changed")));
//!
//! hist.add_item(0).unwrap();
//! assert_eq!(hist.counts(), vec![2, 2, 4]);
//! ```

use std::sync::Arc;

use entropic_core::logging::targets;
use entropic_core::{Listener, ListenerId, Model, Notifier};
use parking_lot::RwLock;

use crate::error::{Error, Result};

/// The category given to histogram items unless another one is chosen.
pub const DEFAULT_CATEGORY: &str = "default";

/// A single datum stored in a bin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Index of the bin holding this item.
    pub x: usize,
    /// Position of this item within its bin, counted from the bottom.
    pub y: usize,
    /// Free-form tag used by views, for example to pick a color.
    pub category: Arc<str>,
}

impl Item {
    /// Create a new item.
    pub fn new(x: usize, y: usize, category: Arc<str>) -> Self {
        Self { x, y, category }
    }
}

/// An ordered set of bins containing items.
///
/// Out-of-range selections are ignored rather than reported. Item operations
/// on a missing bin fail with [`Error::BinOutOfRange`].
pub trait Bins: Model {
    /// Add an item on top of the given bin.
    fn add_item(&self, bin: usize) -> Result<()>;

    /// Remove the topmost item of the given bin. Does nothing if the bin is empty.
    fn remove_item(&self, bin: usize) -> Result<()>;

    /// Add a new bin in the rightmost position.
    fn add_bin(&self) -> Result<()>;

    /// Remove the bin in the rightmost position.
    fn remove_bin(&self) -> Result<()>;

    /// Return a copy of the items in the given bin.
    fn get_bin(&self, bin: usize) -> Option<Vec<Item>>;

    /// Return copies of all bins.
    fn bins(&self) -> Vec<Vec<Item>>;

    /// Returns the number of bins.
    fn num_bins(&self) -> usize;

    /// Select the bin with the given index. Out-of-range indices are ignored.
    fn select_bin(&self, selection: usize);

    /// The selected bin, if any.
    fn selected_bin(&self) -> Option<usize>;

    /// Number of items in each bin.
    fn counts(&self) -> Vec<usize> {
        self.bins().iter().map(Vec::len).collect()
    }

    /// Total number of items across all bins.
    fn total(&self) -> usize {
        self.counts().iter().fold(0, |total, &count| total.saturating_add(count))
    }
}

/// Build bins holding `counts[b]` items each, positioned bottom-up.
/// Sum of per-bin counts, or [`Error::CountOverflow`].
pub(crate) fn checked_total(counts: &[usize]) -> Result<usize> {
    counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .ok_or(Error::CountOverflow)
}

pub(crate) fn stack_items(counts: &[usize], category: &Arc<str>) -> Vec<Vec<Item>> {
    counts
        .iter()
        .enumerate()
        .map(|(bin, &count)| (0..count).map(|y| Item::new(bin, y, category.clone())).collect())
        .collect()
}

struct HistogramState {
    bins: Vec<Vec<Item>>,
    selection: Option<usize>,
}

impl HistogramState {
    fn push_item(&mut self, bin: usize, category: &Arc<str>) -> Result<()> {
        let len = self.bins.len();
        let slot = self
            .bins
            .get_mut(bin)
            .ok_or(Error::BinOutOfRange { bin, len })?;
        let y = slot.len();
        slot.push(Item::new(bin, y, category.clone()));
        Ok(())
    }

    fn pop_item(&mut self, bin: usize) -> Result<Option<Item>> {
        let len = self.bins.len();
        let slot = self
            .bins
            .get_mut(bin)
            .ok_or(Error::BinOutOfRange { bin, len })?;
        Ok(slot.pop())
    }
}

/// A mutable histogram.
pub struct Histogram {
    state: RwLock<HistogramState>,
    category: Arc<str>,
    notifier: Notifier,
}

impl Histogram {
    /// Create a histogram with the given number of empty bins.
    pub fn new(num_bins: usize) -> Self {
        Self::with_category(num_bins, DEFAULT_CATEGORY)
    }

    /// Create a histogram whose items carry the given category.
    pub fn with_category(num_bins: usize, category: impl Into<Arc<str>>) -> Self {
        Self {
            state: RwLock::new(HistogramState {
                bins: vec![Vec::new(); num_bins],
                selection: None,
            }),
            category: category.into(),
            notifier: Notifier::new("histogram"),
        }
    }

    /// Return a histogram with one bin per element of `counts`, each holding
    /// that many items.
    pub fn from_array(counts: &[usize]) -> Self {
        let hist = Self::new(counts.len());
        hist.state.write().bins = stack_items(counts, &hist.category);
        hist
    }

    /// Return a histogram with `length` bins of exactly `n` items each.
    pub fn full(length: usize, n: usize) -> Self {
        Self::from_array(&vec![n; length])
    }

    /// The category given to new items.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Make every bin hold exactly `count` items, notifying once.
    pub fn set_all(&self, count: usize) {
        self.notifier.batch(|| {
            for bin in 0..self.num_bins() {
                {
                    let mut state = self.state.write();
                    let Some(slot) = state.bins.get_mut(bin) else {
                        break;
                    };
                    slot.truncate(count);
                    let start = slot.len();
                    slot.extend((start..count).map(|y| Item::new(bin, y, self.category.clone())));
                }
                self.refresh();
            }
        });
        tracing::trace!(target: targets::BINS, count, "set all bins");
    }

    /// Number of items in a bin, or `None` for a missing bin.
    pub fn bin_len(&self, bin: usize) -> Option<usize> {
        self.state.read().bins.get(bin).map(Vec::len)
    }

    /// Clear the selection.
    pub fn clear_selection(&self) {
        let changed = self.state.write().selection.take().is_some();
        if changed {
            self.refresh();
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.notifier.listener_count()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Model for Histogram {
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

impl Bins for Histogram {
    fn add_item(&self, bin: usize) -> Result<()> {
        self.state.write().push_item(bin, &self.category)?;
        tracing::trace!(target: targets::BINS, bin, "item added");
        self.refresh();
        Ok(())
    }

    fn remove_item(&self, bin: usize) -> Result<()> {
        let removed = self.state.write().pop_item(bin)?;
        if removed.is_none() {
            tracing::trace!(target: targets::BINS, bin, "bin already empty");
        }
        self.refresh();
        Ok(())
    }

    fn add_bin(&self) -> Result<()> {
        self.state.write().bins.push(Vec::new());
        self.refresh();
        Ok(())
    }

    fn remove_bin(&self) -> Result<()> {
        {
            let mut state = self.state.write();
            state.bins.pop();
            let len = state.bins.len();
            if state.selection.is_some_and(|selected| selected >= len) {
                state.selection = None;
            }
        }
        self.refresh();
        Ok(())
    }

    fn get_bin(&self, bin: usize) -> Option<Vec<Item>> {
        self.state.read().bins.get(bin).cloned()
    }

    fn bins(&self) -> Vec<Vec<Item>> {
        self.state.read().bins.clone()
    }

    fn num_bins(&self) -> usize {
        self.state.read().bins.len()
    }

    fn select_bin(&self, selection: usize) {
        {
            let mut state = self.state.write();
            if selection >= state.bins.len() {
                tracing::trace!(target: targets::BINS, selection, "selection out of range, ignored");
                return;
            }
            state.selection = Some(selection);
        }
        self.refresh();
    }

    fn selected_bin(&self) -> Option<usize> {
        self.state.read().selection
    }

    fn counts(&self) -> Vec<usize> {
        self.state.read().bins.iter().map(Vec::len).collect()
    }
}

static_assertions::assert_impl_all!(Histogram: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn counting_listener(model: &dyn Model) -> Arc<Mutex<usize>> {
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        model.add_listener(Arc::new(move || *count_clone.lock() += 1));
        count
    }

    fn assert_positions(hist: &Histogram) {
        for (b, bin) in hist.bins().iter().enumerate() {
            for (k, item) in bin.iter().enumerate() {
                assert_eq!((item.x, item.y), (b, k));
            }
        }
    }

    #[test]
    fn test_from_array() {
        let hist = Histogram::from_array(&[1, 2, 4, 6, 3, 4, 1, 1]);
        assert_eq!(hist.num_bins(), 8);
        assert_eq!(hist.total(), 22);
        assert_eq!(hist.counts(), vec![1, 2, 4, 6, 3, 4, 1, 1]);
        assert_eq!(hist.selected_bin(), None);
        assert_positions(&hist);
    }

    #[test]
    fn test_full() {
        let hist = Histogram::full(8, 1);
        assert_eq!(hist.counts(), vec![1; 8]);
    }

    #[test]
    fn test_add_item_notifies() {
        let hist = Histogram::new(3);
        let count = counting_listener(&hist);

        hist.add_item(1).unwrap();
        hist.add_item(1).unwrap();

        assert_eq!(*count.lock(), 2);
        let bin = hist.get_bin(1).unwrap();
        assert_eq!(bin.len(), 2);
        assert_eq!(bin[1].y, 1);
        assert_eq!(&*bin[1].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_add_item_out_of_range() {
        let hist = Histogram::new(2);
        let count = counting_listener(&hist);

        let err = hist.add_item(2).unwrap_err();
        assert!(matches!(err, Error::BinOutOfRange { bin: 2, len: 2 }));
        assert!(matches!(
            hist.remove_item(5),
            Err(Error::BinOutOfRange { bin: 5, len: 2 })
        ));
        assert_eq!(*count.lock(), 0);
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_remove_item_from_empty_bin() {
        let hist = Histogram::from_array(&[1, 0]);

        hist.remove_item(0).unwrap();
        hist.remove_item(0).unwrap();
        hist.remove_item(1).unwrap();

        assert_eq!(hist.counts(), vec![0, 0]);
    }

    #[test]
    fn test_remove_item_takes_top() {
        let hist = Histogram::from_array(&[3]);
        hist.remove_item(0).unwrap();
        hist.add_item(0).unwrap();
        assert_positions(&hist);
        assert_eq!(hist.bin_len(0), Some(3));
    }

    #[test]
    fn test_add_remove_bin() {
        let hist = Histogram::new(1);
        let count = counting_listener(&hist);

        hist.add_bin().unwrap();
        assert_eq!(hist.num_bins(), 2);
        hist.add_item(1).unwrap();

        hist.remove_bin().unwrap();
        hist.remove_bin().unwrap();
        hist.remove_bin().unwrap();
        assert_eq!(hist.num_bins(), 0);
        assert_eq!(*count.lock(), 5);
    }

    #[test]
    fn test_remove_selected_bin_clears_selection() {
        let hist = Histogram::new(3);

        hist.select_bin(2);
        assert_eq!(hist.selected_bin(), Some(2));

        hist.remove_bin().unwrap();
        assert_eq!(hist.selected_bin(), None);

        hist.select_bin(0);
        hist.remove_bin().unwrap();
        assert_eq!(hist.selected_bin(), Some(0));
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let hist = Histogram::new(3);
        let count = counting_listener(&hist);

        hist.select_bin(1);
        hist.select_bin(3);
        hist.select_bin(usize::MAX);

        assert_eq!(hist.selected_bin(), Some(1));
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_clear_selection() {
        let hist = Histogram::new(2);
        let count = counting_listener(&hist);

        hist.clear_selection();
        assert_eq!(*count.lock(), 0);

        hist.select_bin(0);
        hist.clear_selection();
        assert_eq!(hist.selected_bin(), None);
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_set_all_notifies_once() {
        let hist = Histogram::from_array(&[0, 5, 2]);
        let count = counting_listener(&hist);

        hist.set_all(3);

        assert_eq!(hist.counts(), vec![3, 3, 3]);
        assert_eq!(*count.lock(), 1);
        assert_positions(&hist);
    }

    #[test]
    fn test_get_bin_is_a_copy() {
        let hist = Histogram::from_array(&[2]);
        let mut bin = hist.get_bin(0).unwrap();
        bin.clear();
        assert_eq!(hist.bin_len(0), Some(2));
        assert_eq!(hist.get_bin(1), None);
    }

    #[test]
    fn test_custom_category() {
        let hist = Histogram::with_category(1, "p");
        hist.add_item(0).unwrap();
        assert_eq!(hist.category(), "p");
        assert_eq!(&*hist.bins()[0][0].category, "p");
    }

    #[test]
    fn test_listener_reads_during_refresh() {
        let hist = Arc::new(Histogram::new(2));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let hist_clone = hist.clone();
        let seen_clone = seen.clone();
        hist.add_listener(Arc::new(move || {
            seen_clone.lock().push(hist_clone.total());
        }));

        hist.add_item(0).unwrap();
        hist.add_item(1).unwrap();
        hist.remove_item(0).unwrap();

        assert_eq!(*seen.lock(), vec![1, 2, 1]);
    }

    #[test]
    fn test_conservation() {
        let hist = Histogram::new(4);
        let mut expected = [0usize; 4];

        // Deterministic pseudo-random walk over adds and removes.
        let mut state = 7u32;
        for _ in 0..500 {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let bin = (state >> 16) as usize % 4;
            if (state >> 8) & 1 == 0 {
                hist.add_item(bin).unwrap();
                expected[bin] += 1;
            } else {
                hist.remove_item(bin).unwrap();
                expected[bin] = expected[bin].saturating_sub(1);
            }
        }

        assert_eq!(hist.counts(), expected.to_vec());
        assert_positions(&hist);
    }
}
