//! # Matrix Error Types
//!
//! All errors that can occur while building or combining matrices.

use thiserror::Error;

/// Errors that can occur in matrix construction and algebra.
///
/// A singular matrix is not an error: [`crate::Matrix::inverse`] reports it
/// by returning `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// A flat element sequence whose length is not a perfect square.
    #[error("matrix must be square: {len} elements is not a perfect square")]
    NonSquare {
        /// Number of elements supplied.
        len: usize,
    },

    /// A nested row whose length differs from the row count.
    #[error("matrix must be square: row {row} has {found} elements, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Row count, which every row length must match.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// Two matrices of different dimensions were combined.
    #[error("matrix dimensions do not match: {left}x{left} vs {right}x{right}")]
    DimensionMismatch {
        /// Dimension of the receiver.
        left: usize,
        /// Dimension of the argument.
        right: usize,
    },

    /// An export target does not hold exactly `dim * dim` elements.
    #[error("cannot export {found} elements into a buffer of {expected}")]
    ElementCount {
        /// Size of the export target.
        expected: usize,
        /// Number of elements in the matrix.
        found: usize,
    },
}

/// Result type for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;
