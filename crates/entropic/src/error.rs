//! Error types for the model layer.

use std::fmt;

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A mutating `Bins` operation, used to name what a read-only model refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinsOperation {
    /// Push an item onto a bin.
    AddItem,
    /// Pop the top item of a bin.
    RemoveItem,
    /// Append an empty bin.
    AddBin,
    /// Drop the rightmost bin.
    RemoveBin,
}

impl fmt::Display for BinsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            Self::AddItem => "add an item to",
            Self::RemoveItem => "remove an item from",
            Self::AddBin => "add a bin to",
            Self::RemoveBin => "remove a bin from",
        };
        f.write_str(phrase)
    }
}

/// Errors that can occur in the model layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A mutating operation was invoked on a read-only matrix slice.
    #[error("Cannot {operation} a matrix slice")]
    Unsupported { operation: BinsOperation },

    /// An item operation addressed a bin that does not exist.
    #[error("Bin {bin} is out of range for a histogram with {len} bins")]
    BinOutOfRange { bin: usize, len: usize },

    /// A single-row or single-column slice addressed a missing row or column.
    #[error("Slice index {index} is out of range for a {side}x{side} matrix")]
    SliceOutOfRange { index: usize, side: usize },

    /// A matrix row is shorter or longer than the first row.
    #[error("Matrix row {row} has {found} values, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Matrix input has a different number of rows than columns.
    #[error("Matrix has {rows} rows of {columns} values; a matrix must be square")]
    NotSquare { rows: usize, columns: usize },

    /// Matrix text contained no rows.
    #[error("Matrix text contains no rows")]
    EmptyText,

    /// A matrix field is not a number.
    #[error("Invalid number '{value}' at line {line}, column {column}")]
    Parse {
        line: u64,
        column: usize,
        value: String,
    },

    /// The delimited text reader failed.
    #[error("Failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// Probabilities were requested from a histogram holding no items.
    #[error("Histogram holds no items; frequencies are undefined")]
    EmptyHistogram,

    /// Item counts add up to more than a `usize` can hold.
    #[error("Item counts overflow when summed")]
    CountOverflow,

    /// Two distributions that must line up have different bin counts.
    #[error("Expected {expected} bins, found {found}")]
    BinCountMismatch { expected: usize, found: usize },

    /// The Gaussian parameters do not describe a valid distribution.
    #[error("Invalid Gaussian parameters: {message}")]
    InvalidGaussian { message: String },
}

impl Error {
    /// Create an unsupported-operation error.
    pub fn unsupported(operation: BinsOperation) -> Self {
        Self::Unsupported { operation }
    }

    /// Create a shape error.
    pub fn shape(row: usize, expected: usize, found: usize) -> Self {
        Self::Shape {
            row,
            expected,
            found,
        }
    }

    /// Create a Gaussian parameter error.
    pub fn invalid_gaussian(message: impl Into<String>) -> Self {
        Self::InvalidGaussian {
            message: message.into(),
        }
    }
}
