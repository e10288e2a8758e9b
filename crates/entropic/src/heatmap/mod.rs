//! Square matrices of weighted cells.
//!
//! A [`HeatMap`] is the mutable matrix behind the transport-plan diagrams.
//! Its rows and columns are exposed to histogram views through
//! [`MatrixSlice`], a read-only projection implementing [`Bins`](crate::Bins).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use entropic::heatmap::{HeatMap, Matrix, SliceMode, SliceScale};
//! use entropic::Bins;
//!
//! let plan = Arc::new(HeatMap::from_delimited_text("1,0,0\n0,2,0\n0,0,3").unwrap());
//! let marginal = plan.slice(SliceMode::Rows, SliceScale::normalized(25)).unwrap();
//! assert_eq!(marginal.counts(), vec![4, 8, 12]);
//!
//! plan.set_cell(0, 0, 4.0);
//! assert_eq!(marginal.counts(), vec![11, 5, 8]);
//! ```

mod slice;
mod text;

use std::sync::Arc;

use entropic_core::logging::targets;
use entropic_core::{Listener, ListenerId, Model, Notifier};
use parking_lot::RwLock;

use crate::error::{Error, Result};

pub use slice::{MatrixSlice, SliceMode, SliceScale, MAX_SLICE_COUNT};
pub use text::DelimitedTextOptions;

/// A single matrix entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Row index.
    pub r: usize,
    /// Column index.
    pub c: usize,
    /// Mass held by the cell. Expected to be non-negative.
    pub quantity: f64,
}

/// A square matrix model.
///
/// Out-of-range writes and selections are ignored; out-of-range reads
/// return `None`.
pub trait Matrix: Model {
    /// Set the quantity of a cell and notify.
    fn set_cell(&self, r: usize, c: usize, quantity: f64);

    /// Returns a copy of a cell.
    fn get_cell(&self, r: usize, c: usize) -> Option<Cell>;

    /// Returns copies of the cells in a row.
    fn get_row(&self, r: usize) -> Option<Vec<Cell>>;

    /// Returns copies of the cells in a column.
    fn get_col(&self, c: usize) -> Option<Vec<Cell>>;

    /// Returns copies of all rows.
    fn rows(&self) -> Vec<Vec<Cell>>;

    /// Returns copies of all columns.
    fn cols(&self) -> Vec<Vec<Cell>>;

    /// Number of rows, equal to the number of columns.
    fn side_length(&self) -> usize;

    /// Select a column. Out-of-range indices are ignored.
    fn select_column(&self, c: usize);

    /// The selected column, if any.
    fn selected_column(&self) -> Option<usize>;

    /// Sum of each row.
    fn quantity_per_row(&self) -> Vec<f64> {
        self.rows()
            .iter()
            .map(|row| row.iter().map(|cell| cell.quantity).sum())
            .collect()
    }

    /// Sum of each column.
    fn quantity_per_col(&self) -> Vec<f64> {
        self.cols()
            .iter()
            .map(|col| col.iter().map(|cell| cell.quantity).sum())
            .collect()
    }

    /// Sum of every cell.
    fn total(&self) -> f64 {
        self.quantity_per_row().iter().sum()
    }
}

struct HeatMapState {
    grid: Vec<Vec<f64>>,
    selection: Option<usize>,
}

impl HeatMapState {
    fn row(&self, r: usize) -> Option<Vec<Cell>> {
        let row = self.grid.get(r)?;
        Some(
            row.iter()
                .enumerate()
                .map(|(c, &quantity)| Cell { r, c, quantity })
                .collect(),
        )
    }

    fn col(&self, c: usize) -> Option<Vec<Cell>> {
        if c >= self.grid.len() {
            return None;
        }
        Some(
            self.grid
                .iter()
                .enumerate()
                .map(|(r, row)| Cell {
                    r,
                    c,
                    quantity: row[c],
                })
                .collect(),
        )
    }

    fn set(&mut self, r: usize, c: usize, quantity: f64) -> bool {
        match self.grid.get_mut(r).and_then(|row| row.get_mut(c)) {
            Some(slot) => {
                *slot = quantity;
                true
            }
            None => false,
        }
    }
}

/// A mutable square matrix.
pub struct HeatMap {
    state: RwLock<HeatMapState>,
    notifier: Notifier,
}

impl HeatMap {
    /// Create a `side` x `side` matrix of zeros.
    pub fn new(side: usize) -> Self {
        Self::from_grid(vec![vec![0.0; side]; side])
    }

    /// Create a matrix from row-major values.
    ///
    /// Every row must have as many values as there are rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let side = rows.first().map_or(0, Vec::len);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != side {
                return Err(Error::shape(row, side, values.len()));
            }
        }
        if rows.len() != side {
            return Err(Error::NotSquare {
                rows: rows.len(),
                columns: side,
            });
        }
        Ok(Self::from_grid(rows))
    }

    /// Parse a comma-separated matrix, one row per line.
    pub fn from_delimited_text(text: &str) -> Result<Self> {
        Self::from_delimited_text_with_options(text, &DelimitedTextOptions::default())
    }

    /// Parse a delimited matrix with custom options.
    pub fn from_delimited_text_with_options(
        text: &str,
        options: &DelimitedTextOptions,
    ) -> Result<Self> {
        let rows = text::parse_rows(text, options)?;
        let map = Self::from_rows(rows)?;
        tracing::debug!(target: targets::HEATMAP, side = map.side_length(), "matrix parsed");
        Ok(map)
    }

    fn from_grid(grid: Vec<Vec<f64>>) -> Self {
        Self {
            state: RwLock::new(HeatMapState {
                grid,
                selection: None,
            }),
            notifier: Notifier::new("heatmap"),
        }
    }

    /// Set several cells, notifying once.
    ///
    /// Out-of-range entries are skipped.
    pub fn set_cells(&self, cells: impl IntoIterator<Item = (usize, usize, f64)>) {
        self.notifier.batch(|| {
            for (r, c, quantity) in cells {
                self.set_cell(r, c, quantity);
            }
        });
    }

    /// Copy of the row-major values.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.state.read().grid.clone()
    }

    /// Clear the column selection.
    pub fn clear_selection(&self) {
        let changed = self.state.write().selection.take().is_some();
        if changed {
            self.refresh();
        }
    }

    /// A projection of this matrix as read-only bins.
    pub fn slice(self: &Arc<Self>, mode: SliceMode, scale: SliceScale) -> Result<MatrixSlice> {
        MatrixSlice::new(self, mode, scale)
    }

    /// Column totals, as percentages of the whole matrix.
    pub fn row_hist(self: &Arc<Self>) -> MatrixSlice {
        MatrixSlice::whole(self, SliceMode::Rows, SliceScale::percent())
    }

    /// Row totals, as percentages of the whole matrix.
    pub fn col_hist(self: &Arc<Self>) -> MatrixSlice {
        MatrixSlice::whole(self, SliceMode::Cols, SliceScale::percent())
    }

    /// One row, as percentages of the row total.
    pub fn row_slice_hist(self: &Arc<Self>, row: usize) -> Result<MatrixSlice> {
        self.slice(SliceMode::Row(row), SliceScale::percent())
    }

    /// One column, as percentages of the column total.
    pub fn col_slice_hist(self: &Arc<Self>, col: usize) -> Result<MatrixSlice> {
        self.slice(SliceMode::Col(col), SliceScale::percent())
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.notifier.listener_count()
    }
}

impl Model for HeatMap {
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

impl Matrix for HeatMap {
    fn set_cell(&self, r: usize, c: usize, quantity: f64) {
        if !self.state.write().set(r, c, quantity) {
            tracing::trace!(target: targets::HEATMAP, r, c, "cell out of range, ignored");
            return;
        }
        tracing::trace!(target: targets::HEATMAP, r, c, quantity, "cell set");
        self.refresh();
    }

    fn get_cell(&self, r: usize, c: usize) -> Option<Cell> {
        let state = self.state.read();
        let quantity = *state.grid.get(r)?.get(c)?;
        Some(Cell { r, c, quantity })
    }

    fn get_row(&self, r: usize) -> Option<Vec<Cell>> {
        self.state.read().row(r)
    }

    fn get_col(&self, c: usize) -> Option<Vec<Cell>> {
        self.state.read().col(c)
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        let state = self.state.read();
        (0..state.grid.len()).filter_map(|r| state.row(r)).collect()
    }

    fn cols(&self) -> Vec<Vec<Cell>> {
        let state = self.state.read();
        (0..state.grid.len()).filter_map(|c| state.col(c)).collect()
    }

    fn side_length(&self) -> usize {
        self.state.read().grid.len()
    }

    fn select_column(&self, c: usize) {
        {
            let mut state = self.state.write();
            if c >= state.grid.len() {
                tracing::trace!(target: targets::HEATMAP, c, "column out of range, ignored");
                return;
            }
            state.selection = Some(c);
        }
        self.refresh();
    }

    fn selected_column(&self) -> Option<usize> {
        self.state.read().selection
    }

    fn quantity_per_row(&self) -> Vec<f64> {
        self.state
            .read()
            .grid
            .iter()
            .map(|row| row.iter().sum())
            .collect()
    }

    fn quantity_per_col(&self) -> Vec<f64> {
        let state = self.state.read();
        (0..state.grid.len())
            .map(|c| state.grid.iter().map(|row| row[c]).sum())
            .collect()
    }
}

static_assertions::assert_impl_all!(HeatMap: Send, Sync);
