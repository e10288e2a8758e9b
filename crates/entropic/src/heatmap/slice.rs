//! Read-only histogram projections of a matrix.

use std::sync::{Arc, Weak};

use entropic_core::logging::targets;
use entropic_core::{Listener, ListenerId, Model, SignalError};

use super::Matrix;
use crate::bins::{self, Bins, Item, DEFAULT_CATEGORY};
use crate::error::{BinsOperation, Error, Result};

/// Which quantities of the matrix become bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceMode {
    /// One bin per column, holding that column's total.
    Rows,
    /// One bin per row, holding that row's total.
    Cols,
    /// The cells of one row.
    Row(usize),
    /// The cells of one column.
    Col(usize),
}

/// How projected quantities turn into item counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceScale {
    /// Each bin holds `floor(quantity)` items, capped at [`MAX_SLICE_COUNT`].
    Raw,
    /// Each bin holds `floor(budget * quantity / total)` items, where `total`
    /// is the sum of the projected quantities. An empty projection gives
    /// zeros.
    Normalized { budget: usize },
}

impl SliceScale {
    /// Normalized to a budget of 100 items.
    pub const fn percent() -> Self {
        Self::Normalized { budget: 100 }
    }

    /// Normalized to the given budget.
    pub const fn normalized(budget: usize) -> Self {
        Self::Normalized { budget }
    }

    /// Convert projected quantities to item counts.
    pub fn apply(&self, quantities: &[f64]) -> Vec<usize> {
        match *self {
            Self::Raw => quantities.iter().map(|&q| floor_count(q)).collect(),
            Self::Normalized { budget } => {
                let total: f64 = quantities.iter().sum();
                if !total.is_finite() || total <= 0.0 {
                    return vec![0; quantities.len()];
                }
                quantities
                    .iter()
                    .map(|&q| floor_count(budget as f64 * q / total))
                    .collect()
            }
        }
    }
}

impl Default for SliceScale {
    fn default() -> Self {
        Self::percent()
    }
}

/// Largest item count a slice reports for a single bin.
pub const MAX_SLICE_COUNT: usize = u32::MAX as usize;

fn floor_count(value: f64) -> usize {
    // Negative and NaN quantities count as empty.
    (value.max(0.0).floor() as usize).min(MAX_SLICE_COUNT)
}

/// A read-only [`Bins`] view of a [`Matrix`].
///
/// The slice owns no data: every read recomputes the projection from the
/// matrix, so a slice always reflects the matrix's current state. Listeners
/// registered on a slice are registered on the matrix. Selecting a bin
/// selects the matrix column with the same index.
///
/// Every mutating [`Bins`] operation fails with [`Error::Unsupported`] and
/// leaves the matrix untouched.
pub struct MatrixSlice {
    matrix: Weak<dyn Matrix>,
    mode: SliceMode,
    scale: SliceScale,
}

impl MatrixSlice {
    /// Create a slice of `matrix`.
    ///
    /// Fails with [`Error::SliceOutOfRange`] if a `Row` or `Col` index is
    /// not inside the matrix.
    pub fn new<M: Matrix + 'static>(
        matrix: &Arc<M>,
        mode: SliceMode,
        scale: SliceScale,
    ) -> Result<Self> {
        if let SliceMode::Row(index) | SliceMode::Col(index) = mode {
            let side = matrix.side_length();
            if index >= side {
                return Err(Error::SliceOutOfRange { index, side });
            }
        }
        Ok(Self::whole(matrix, mode, scale))
    }

    /// Create a slice without checking the mode's index.
    pub(super) fn whole<M: Matrix + 'static>(
        matrix: &Arc<M>,
        mode: SliceMode,
        scale: SliceScale,
    ) -> Self {
        let matrix: Weak<dyn Matrix> = Arc::downgrade(matrix) as Weak<dyn Matrix>;
        Self {
            matrix,
            mode,
            scale,
        }
    }

    /// The projection mode.
    pub fn mode(&self) -> SliceMode {
        self.mode
    }

    /// The scaling applied to projected quantities.
    pub fn scale(&self) -> SliceScale {
        self.scale
    }

    /// The backing matrix, if it is still alive.
    pub fn matrix(&self) -> Option<Arc<dyn Matrix>> {
        self.matrix.upgrade()
    }

    /// Projected quantities before scaling.
    pub fn quantities(&self) -> Vec<f64> {
        let Some(matrix) = self.matrix.upgrade() else {
            return Vec::new();
        };
        let cells_of = |cells: Option<Vec<super::Cell>>| -> Vec<f64> {
            cells
                .unwrap_or_default()
                .iter()
                .map(|cell| cell.quantity)
                .collect()
        };
        match self.mode {
            SliceMode::Rows => matrix.quantity_per_col(),
            SliceMode::Cols => matrix.quantity_per_row(),
            SliceMode::Row(r) => cells_of(matrix.get_row(r)),
            SliceMode::Col(c) => cells_of(matrix.get_col(c)),
        }
    }

    fn reject(&self, operation: BinsOperation) -> Result<()> {
        tracing::debug!(target: targets::HEATMAP, mode = ?self.mode, %operation, "slice mutation rejected");
        Err(Error::unsupported(operation))
    }
}

impl Model for MatrixSlice {
    fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        match self.matrix.upgrade() {
            Some(matrix) => matrix.add_listener(listener),
            None => {
                tracing::warn!(target: targets::HEATMAP, "listener added to a slice of a dropped matrix");
                ListenerId::default()
            }
        }
    }

    fn remove_listener(&self, id: ListenerId) -> entropic_core::Result<()> {
        match self.matrix.upgrade() {
            Some(matrix) => matrix.remove_listener(id),
            None => Err(SignalError::ModelDropped.into()),
        }
    }

    fn refresh(&self) {
        match self.matrix.upgrade() {
            Some(matrix) => matrix.refresh(),
            None => tracing::trace!(target: targets::HEATMAP, "refresh of a slice of a dropped matrix"),
        }
    }
}

impl Bins for MatrixSlice {
    fn add_item(&self, _bin: usize) -> Result<()> {
        self.reject(BinsOperation::AddItem)
    }

    fn remove_item(&self, _bin: usize) -> Result<()> {
        self.reject(BinsOperation::RemoveItem)
    }

    fn add_bin(&self) -> Result<()> {
        self.reject(BinsOperation::AddBin)
    }

    fn remove_bin(&self) -> Result<()> {
        self.reject(BinsOperation::RemoveBin)
    }

    fn get_bin(&self, bin: usize) -> Option<Vec<Item>> {
        let count = *self.counts().get(bin)?;
        let category: Arc<str> = Arc::from(DEFAULT_CATEGORY);
        Some((0..count).map(|y| Item::new(bin, y, category.clone())).collect())
    }

    fn bins(&self) -> Vec<Vec<Item>> {
        bins::stack_items(&self.counts(), &Arc::from(DEFAULT_CATEGORY))
    }

    fn num_bins(&self) -> usize {
        self.quantities().len()
    }

    fn select_bin(&self, selection: usize) {
        if let Some(matrix) = self.matrix.upgrade() {
            matrix.select_column(selection);
        }
    }

    fn selected_bin(&self) -> Option<usize> {
        self.matrix.upgrade()?.selected_column()
    }

    fn counts(&self) -> Vec<usize> {
        self.scale.apply(&self.quantities())
    }
}

static_assertions::assert_impl_all!(MatrixSlice: Send, Sync);
