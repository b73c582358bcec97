//! Square dense matrix.
//!
//! Every operation is pure: the receiver and the argument are never
//! mutated, a fresh [`Matrix`] is returned instead. Elements are kept
//! row-major internally regardless of the order they were supplied in;
//! the renderer wants column-major flat arrays, so the export functions
//! take the order as a parameter.

use crate::error::{MatrixError, MatrixResult};

/// A `dim × dim` grid of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Side length.
    dim: usize,
    /// Row-major elements, `dim * dim` long.
    elements: Vec<f64>,
}

impl Matrix {
    /// Builds a matrix from a flat sequence of `d²` elements.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NonSquare`] if the length is not a perfect square.
    pub fn from_flat(elements: &[f64], column_major: bool) -> MatrixResult<Self> {
        let dim = square_side(elements.len()).ok_or(MatrixError::NonSquare {
            len: elements.len(),
        })?;

        let elements = if column_major {
            transposed(elements, dim)
        } else {
            elements.to_vec()
        };

        Ok(Self { dim, elements })
    }

    /// Builds a matrix from `d` rows of `d` elements each.
    ///
    /// When `column_major` is set, each inner sequence is read as a column.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::RaggedRows`] if any inner sequence length
    /// differs from the number of sequences.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], column_major: bool) -> MatrixResult<Self> {
        let dim = rows.len();
        let mut elements = Vec::with_capacity(dim * dim);

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != dim {
                return Err(MatrixError::RaggedRows {
                    row,
                    expected: dim,
                    found: values.len(),
                });
            }
            elements.extend_from_slice(values);
        }

        if column_major {
            elements = transposed(&elements, dim);
        }

        Ok(Self { dim, elements })
    }

    /// The `dim × dim` identity matrix.
    #[must_use]
    pub fn identity(dim: usize) -> Self {
        let mut elements = vec![0.0; dim * dim];
        for i in 0..dim {
            elements[i * dim + i] = 1.0;
        }
        Self { dim, elements }
    }

    /// The `dim × dim` zero matrix.
    #[must_use]
    pub fn zero(dim: usize) -> Self {
        Self {
            dim,
            elements: vec![0.0; dim * dim],
        }
    }

    /// Builds a 4×4 matrix from row literals.
    pub(crate) fn from_4x4(rows: [[f64; 4]; 4]) -> Self {
        Self {
            dim: 4,
            elements: rows.iter().flatten().copied().collect(),
        }
    }

    /// Side length of the matrix.
    #[inline]
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Element at `(row, col)`, or `None` when out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.dim && col < self.dim {
            Some(self.at(row, col))
        } else {
            None
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.elements[row * self.dim + col]
    }

    fn check_dim(&self, other: &Self) -> MatrixResult<()> {
        if self.dim == other.dim {
            Ok(())
        } else {
            Err(MatrixError::DimensionMismatch {
                left: self.dim,
                right: other.dim,
            })
        }
    }

    /// Standard matrix product `self · other`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if the dimensions differ.
    pub fn multiply(&self, other: &Self) -> MatrixResult<Self> {
        self.check_dim(other)?;

        let dim = self.dim;
        let mut elements = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                let dot = (0..dim).fold(0.0, |acc, i| acc + self.at(row, i) * other.at(i, col));
                elements.push(dot);
            }
        }

        Ok(Self { dim, elements })
    }

    /// Element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] if the dimensions differ.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Self) -> MatrixResult<Self> {
        self.check_dim(other)?;

        let elements = self
            .elements
            .iter()
            .zip(&other.elements)
            .map(|(a, b)| a + b)
            .collect();

        Ok(Self {
            dim: self.dim,
            elements,
        })
    }

    /// Multiplies every element by `value`.
    #[must_use]
    pub fn scale(&self, value: f64) -> Self {
        Self {
            dim: self.dim,
            elements: self.elements.iter().map(|e| e * value).collect(),
        }
    }

    /// Rows become columns.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            dim: self.dim,
            elements: transposed(&self.elements, self.dim),
        }
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// Matrices smaller than 2×2 report `0.0`. That is not meaningful linear
    /// algebra, but callers rely on it (a 1×1 matrix is never invertible).
    #[must_use]
    pub fn determinant(&self) -> f64 {
        match self.dim {
            0 | 1 => 0.0,
            2 => self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0),
            dim => (0..dim).fold(0.0, |acc, col| {
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                acc + sign * self.at(0, col) * self.submatrix(0, col).determinant()
            }),
        }
    }

    /// Matrix of minors: each entry replaced by the determinant of the
    /// submatrix left after deleting its row and column.
    #[must_use]
    pub fn minors(&self) -> Self {
        self.map_submatrices(|_, _, det| det)
    }

    /// Minors with the checkerboard sign `(-1)^(row+col)` applied.
    #[must_use]
    pub fn cofactors(&self) -> Self {
        self.map_submatrices(|row, col, det| {
            if (row + col) % 2 == 0 {
                det
            } else {
                -det
            }
        })
    }

    /// `(1/det) · transpose(cofactors())`, or `None` when the determinant is
    /// exactly zero.
    ///
    /// The singularity check is an exact comparison: a nearly singular
    /// matrix still inverts, dividing by its tiny determinant.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }
        Some(self.cofactors().scale(1.0 / det).transpose())
    }

    /// Flat export in the requested order.
    #[must_use]
    pub fn to_flat(&self, column_major: bool) -> Vec<f64> {
        if column_major {
            transposed(&self.elements, self.dim)
        } else {
            self.elements.clone()
        }
    }

    /// Nested export; with `column_major` each inner vector is a column.
    #[must_use]
    pub fn to_rows(&self, column_major: bool) -> Vec<Vec<f64>> {
        let flat = self.to_flat(column_major);
        if self.dim == 0 {
            return Vec::new();
        }
        flat.chunks(self.dim).map(<[f64]>::to_vec).collect()
    }

    /// Flat single-precision export into a fixed-size array, as consumed by
    /// GPU uniforms and instance buffers.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ElementCount`] unless `N == dim * dim`.
    pub fn to_f32_array<const N: usize>(&self, column_major: bool) -> MatrixResult<[f32; N]> {
        if N != self.elements.len() {
            return Err(MatrixError::ElementCount {
                expected: N,
                found: self.elements.len(),
            });
        }

        let mut out = [0.0f32; N];
        let dim = self.dim;
        for (i, slot) in out.iter_mut().enumerate() {
            let (row, col) = if column_major {
                (i % dim, i / dim)
            } else {
                (i / dim, i % dim)
            };
            *slot = self.at(row, col) as f32;
        }
        Ok(out)
    }

    /// Copy of this matrix without `skip_row` and `skip_col`.
    fn submatrix(&self, skip_row: usize, skip_col: usize) -> Self {
        let dim = self.dim.saturating_sub(1);
        let mut elements = Vec::with_capacity(dim * dim);
        for row in (0..self.dim).filter(|&r| r != skip_row) {
            for col in (0..self.dim).filter(|&c| c != skip_col) {
                elements.push(self.at(row, col));
            }
        }
        Self { dim, elements }
    }

    fn map_submatrices(&self, f: impl Fn(usize, usize, f64) -> f64) -> Self {
        let dim = self.dim;
        let mut elements = Vec::with_capacity(dim * dim);
        for row in 0..dim {
            for col in 0..dim {
                elements.push(f(row, col, self.submatrix(row, col).determinant()));
            }
        }
        Self { dim, elements }
    }
}

fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}

fn transposed(elements: &[f64], dim: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(elements.len());
    for col in 0..dim {
        for row in 0..dim {
            out.push(elements[row * dim + col]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.to_flat(false).iter().zip(b.to_flat(false)) {
            assert!((x - y).abs() < EPSILON, "{x} != {y}");
        }
    }

    fn sample(dim: usize, seed: f64) -> Matrix {
        let elements: Vec<f64> = (0..dim * dim)
            .map(|i| ((i as f64 + 1.0) * seed).sin() * 3.0 + (i % 3) as f64)
            .collect();
        Matrix::from_flat(&elements, false).unwrap()
    }

    #[test]
    fn test_non_square_flat_rejected() {
        let err = Matrix::from_flat(&[1.0, 2.0, 3.0], false).unwrap_err();
        assert_eq!(err, MatrixError::NonSquare { len: 3 });
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Matrix::from_rows(&rows, false).unwrap_err();
        assert_eq!(
            err,
            MatrixError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_column_major_input_is_transposed() {
        let m = Matrix::from_flat(&[1.0, 2.0, 3.0, 4.0], true).unwrap();
        assert_eq!(m.get(0, 1), Some(3.0));
        assert_eq!(m.get(1, 0), Some(2.0));

        let nested = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]], true).unwrap();
        assert_eq!(nested, m);
    }

    #[test]
    fn test_flat_round_trip() {
        let input: Vec<f64> = (0..9).map(f64::from).collect();
        let m = Matrix::from_flat(&input, false).unwrap();
        assert_eq!(m.to_flat(false), input);
        assert_eq!(m.to_rows(false)[2], vec![6.0, 7.0, 8.0]);
        assert_eq!(m.to_rows(true)[0], vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let err = Matrix::identity(3).multiply(&Matrix::identity(4)).unwrap_err();
        assert_eq!(err, MatrixError::DimensionMismatch { left: 3, right: 4 });
        assert!(Matrix::identity(2).add(&Matrix::identity(3)).is_err());
    }

    #[test]
    fn test_multiply_known_product() {
        let a = Matrix::from_flat(&[1.0, 2.0, 3.0, 4.0], false).unwrap();
        let b = Matrix::from_flat(&[5.0, 6.0, 7.0, 8.0], false).unwrap();
        let ab = a.multiply(&b).unwrap();
        assert_eq!(ab.to_flat(false), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_multiply_associative() {
        for dim in 2..=5 {
            let a = sample(dim, 0.7);
            let b = sample(dim, 1.3);
            let c = sample(dim, 2.1);
            let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
            let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
            assert_close(&left, &right);
        }
    }

    #[test]
    fn test_identity_is_neutral() {
        for dim in 1..=5 {
            let a = sample(dim, 0.3);
            assert_eq!(a.multiply(&Matrix::identity(dim)).unwrap(), a);
        }
    }

    #[test]
    fn test_add_and_scale() {
        let a = Matrix::from_flat(&[1.0, 2.0, 3.0, 4.0], false).unwrap();
        let sum = a.add(&a.scale(2.0)).unwrap();
        assert_eq!(sum.to_flat(false), vec![3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_identity_determinant() {
        for dim in 2..=6 {
            assert!((Matrix::identity(dim).determinant() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_small_determinant_quirk() {
        assert_eq!(Matrix::identity(1).determinant(), 0.0);
        assert_eq!(Matrix::zero(0).determinant(), 0.0);
        assert!(Matrix::identity(1).inverse().is_none());
    }

    #[test]
    fn test_determinant_3x3() {
        let m = Matrix::from_flat(&[2.0, 0.0, 1.0, 1.0, 3.0, 2.0, 1.0, 1.0, 1.0], false).unwrap();
        // 2*(3-2) - 0 + 1*(1-3)
        assert!((m.determinant() - 0.0).abs() < EPSILON);

        let m = Matrix::from_flat(&[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0], false).unwrap();
        assert!((m.determinant() - -306.0).abs() < EPSILON);
    }

    #[test]
    fn test_minors_and_cofactors() {
        let m = Matrix::from_flat(&[3.0, 0.0, 2.0, 2.0, 0.0, -2.0, 0.0, 1.0, 1.0], false).unwrap();
        assert_eq!(
            m.minors().to_flat(false),
            vec![2.0, 2.0, 2.0, -2.0, 3.0, 3.0, 0.0, -10.0, 0.0]
        );
        assert_eq!(
            m.cofactors().to_flat(false),
            vec![2.0, -2.0, 2.0, 2.0, 3.0, -3.0, 0.0, 10.0, 0.0]
        );
    }

    #[test]
    fn test_inverse_restores_identity() {
        for dim in 2..=5 {
            let a = sample(dim, 0.9).add(&Matrix::identity(dim).scale(5.0)).unwrap();
            let inv = a.inverse().expect("shifted sample is invertible");
            assert_close(&a.multiply(&inv).unwrap(), &Matrix::identity(dim));
        }
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let m = Matrix::from_flat(&[1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0], false).unwrap();
        assert_eq!(m.determinant(), 0.0);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_identity_export_symmetric() {
        let id = Matrix::identity(4);
        let col: [f32; 16] = id.to_f32_array(true).unwrap();
        let row: [f32; 16] = id.to_f32_array(false).unwrap();
        assert_eq!(bytes(&col), bytes(&row));
        assert_eq!(id.to_flat(true), id.to_flat(false));
    }

    #[test]
    fn test_f32_export_order_and_size() {
        let m = Matrix::from_flat(&[1.0, 2.0, 3.0, 4.0], false).unwrap();
        assert_eq!(m.to_f32_array::<4>(true).unwrap(), [1.0, 3.0, 2.0, 4.0]);
        assert_eq!(
            m.to_f32_array::<9>(false).unwrap_err(),
            MatrixError::ElementCount { expected: 9, found: 4 }
        );
    }

    fn bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}
