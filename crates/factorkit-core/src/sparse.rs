//! Sparse matrix support for factorization targets.
//!
//! Sparse targets are stored in Compressed Sparse Row (CSR) form. A
//! coordinate (COO) builder is provided for assembling them entry by entry.

use crate::{
    error::{MfError as Error, Result},
    types::{cast_scalar, shape_string, DMatrix, Scalar},
};
use num_traits::{Float, ToPrimitive};

/// Compressed Sparse Row (CSR) format matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCsr<T>"))]
#[cfg_attr(
    feature = "serde",
    serde(bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct CsrMatrix<T: Scalar> {
    /// Number of rows
    nrows: usize,
    /// Number of columns
    ncols: usize,
    /// Row pointers (length nrows + 1)
    row_ptr: Vec<usize>,
    /// Column indices (length nnz)
    col_idx: Vec<usize>,
    /// Stored values (length nnz)
    values: Vec<T>,
}

/// Unchecked CSR parts as they appear in serialized form.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCsr<T> {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<RawCsr<T>> for CsrMatrix<T> {
    type Error = Error;

    fn try_from(raw: RawCsr<T>) -> Result<Self> {
        Self::new(raw.nrows, raw.ncols, raw.row_ptr, raw.col_idx, raw.values)
    }
}

impl<T: Scalar> CsrMatrix<T> {
    /// Creates a new CSR matrix from raw data.
    ///
    /// Column indices inside a row may be unsorted and may repeat; call
    /// [`CsrMatrix::canonicalize`] to bring the matrix to canonical form.
    pub fn new(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptr.len() != nrows + 1 {
            return Err(Error::dimension_mismatch(
                format!("row_ptr length {}", nrows + 1),
                format!("row_ptr length {}", row_ptr.len()),
            ));
        }

        if row_ptr[0] != 0 || row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::configuration(
                "row_ptr must start at 0 and be non-decreasing",
            ));
        }

        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz {
            return Err(Error::dimension_mismatch(
                format!("col_idx length {}", nnz),
                format!("col_idx length {}", col_idx.len()),
            ));
        }

        if values.len() != nnz {
            return Err(Error::dimension_mismatch(
                format!("values length {}", nnz),
                format!("values length {}", values.len()),
            ));
        }

        if let Some(&j) = col_idx.iter().find(|&&j| j >= ncols) {
            return Err(Error::dimension_mismatch(
                format!("col < {}", ncols),
                format!("col = {}", j),
            ));
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Creates a CSR matrix from raw data of any primitive numeric type,
    /// converting each stored value to `T`.
    pub fn from_parts_cast<U>(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<U>,
    ) -> Result<Self>
    where
        U: ToPrimitive + Copy + std::fmt::Debug,
    {
        let values = values
            .into_iter()
            .map(cast_scalar)
            .collect::<Result<Vec<T>>>()?;
        Self::new(nrows, ncols, row_ptr, col_idx, values)
    }

    /// Creates a CSR matrix from a dense matrix, dropping entries whose
    /// magnitude does not exceed `tolerance`.
    pub fn from_dense(dense: &DMatrix<T>, tolerance: T) -> Self {
        let mut row_ptr = vec![0];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let val = dense[(i, j)];
                if Float::abs(val) > tolerance {
                    col_idx.push(j);
                    values.push(val);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            nrows: dense.nrows(),
            ncols: dense.ncols(),
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Converts to a dense matrix.
    ///
    /// Repeated entries of a non-canonical matrix are summed.
    pub fn to_dense(&self) -> DMatrix<T> {
        let mut dense = DMatrix::zeros(self.nrows, self.ncols);

        for i in 0..self.nrows {
            for (j, v) in self.row(i) {
                dense[(i, j)] = dense[(i, j)] + v;
            }
        }

        dense
    }

    /// Returns the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Returns `(nrows, ncols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Returns the number of stored elements.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns the sparsity (fraction of elements not stored).
    #[inline]
    pub fn sparsity(&self) -> f64 {
        let total_elements = self.nrows * self.ncols;
        if total_elements == 0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / total_elements as f64)
        }
    }

    /// Stored values, in row order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterates over the `(column, value)` pairs stored in row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= nrows`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Whether every row has strictly increasing column indices.
    pub fn is_canonical(&self) -> bool {
        (0..self.nrows).all(|i| {
            self.col_idx[self.row_ptr[i]..self.row_ptr[i + 1]]
                .windows(2)
                .all(|w| w[0] < w[1])
        })
    }

    /// Sorts every row by column index and sums repeated entries.
    pub fn canonicalize(self) -> Self {
        if self.is_canonical() {
            return self;
        }

        let mut row_ptr = Vec::with_capacity(self.nrows + 1);
        let mut col_idx = Vec::with_capacity(self.nnz());
        let mut values = Vec::with_capacity(self.nnz());
        row_ptr.push(0);

        for i in 0..self.nrows {
            let mut entries: Vec<(usize, T)> = self.row(i).collect();
            entries.sort_by_key(|&(j, _)| j);

            let row_start = col_idx.len();
            for (j, v) in entries {
                if col_idx.len() > row_start && col_idx[col_idx.len() - 1] == j {
                    let last = values.len() - 1;
                    values[last] = values[last] + v;
                } else {
                    col_idx.push(j);
                    values.push(v);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Sum of squares of the stored values.
    pub fn sum_squares(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, &v| acc + v * v)
    }
}

/// Coordinate (COO) format matrix for easier construction.
#[derive(Debug, Clone)]
pub struct CooMatrix<T: Scalar> {
    /// Number of rows
    nrows: usize,
    /// Number of columns
    ncols: usize,
    /// Triplets (row, col, value)
    triplets: Vec<(usize, usize, T)>,
}

impl<T: Scalar> CooMatrix<T> {
    /// Creates a new empty COO matrix.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            triplets: Vec::new(),
        }
    }

    /// Adds an entry to the matrix. Zero values are not stored.
    pub fn push(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.nrows {
            return Err(Error::dimension_mismatch(
                format!("row < {}", self.nrows),
                format!("row = {}", row),
            ));
        }

        if col >= self.ncols {
            return Err(Error::dimension_mismatch(
                format!("col < {}", self.ncols),
                format!("col = {}", col),
            ));
        }

        if value != T::zero() {
            self.triplets.push((row, col, value));
        }

        Ok(())
    }

    /// Returns `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Converts to canonical CSR format, summing duplicate entries.
    pub fn to_csr(&self) -> CsrMatrix<T> {
        let mut sorted_triplets = self.triplets.clone();
        sorted_triplets.sort_by_key(|&(r, c, _)| (r, c));

        let mut unique_triplets: Vec<(usize, usize, T)> = Vec::new();
        for (r, c, v) in sorted_triplets {
            if let Some(last) = unique_triplets.last_mut() {
                let (last_r, last_c, ref mut last_v) = *last;
                if last_r == r && last_c == c {
                    *last_v = *last_v + v;
                    continue;
                }
            }
            unique_triplets.push((r, c, v));
        }

        let mut row_ptr = vec![0];
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        let mut current_row = 0;
        for (r, c, v) in unique_triplets {
            while current_row < r {
                row_ptr.push(col_idx.len());
                current_row += 1;
            }
            col_idx.push(c);
            values.push(v);
        }

        while current_row < self.nrows {
            row_ptr.push(col_idx.len());
            current_row += 1;
        }

        CsrMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            row_ptr,
            col_idx,
            values,
        }
    }
}

impl<T: Scalar> From<CooMatrix<T>> for CsrMatrix<T> {
    fn from(coo: CooMatrix<T>) -> Self {
        coo.to_csr()
    }
}

pub(crate) fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<()> {
    if expected != actual {
        return Err(Error::dimension_mismatch(
            shape_string(expected),
            shape_string(actual),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_from_dense() {
        let dense = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.0, 2.0,
            0.0, 3.0, 0.0,
            4.0, 0.0, 5.0,
        ]);

        let csr = CsrMatrix::from_dense(&dense, 1e-10);
        assert_eq!(csr.nrows(), 3);
        assert_eq!(csr.ncols(), 3);
        assert_eq!(csr.nnz(), 5);
        assert!((csr.sparsity() - 4.0 / 9.0).abs() < 1e-10);
        assert!(csr.is_canonical());

        let reconstructed = csr.to_dense();
        assert_eq!(dense, reconstructed);
    }

    #[test]
    fn test_csr_new_validation() {
        let bad_ptr = CsrMatrix::<f64>::new(2, 2, vec![0, 1], vec![0], vec![1.0]);
        assert!(matches!(bad_ptr, Err(Error::DimensionMismatch { .. })));

        let bad_col = CsrMatrix::<f64>::new(1, 2, vec![0, 1], vec![2], vec![1.0]);
        assert!(matches!(bad_col, Err(Error::DimensionMismatch { .. })));

        let decreasing = CsrMatrix::<f64>::new(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0, 2.0]);
        assert!(matches!(decreasing, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_canonicalize_sorts_and_sums() {
        let csr = CsrMatrix::new(
            2,
            3,
            vec![0, 3, 4],
            vec![2, 0, 2, 1],
            vec![1.0, 2.0, 3.0, 4.0],
        )
        .unwrap();
        assert!(!csr.is_canonical());
        let before = csr.to_dense();

        let canonical = csr.canonicalize();
        assert!(canonical.is_canonical());
        assert_eq!(canonical.nnz(), 3);
        assert_eq!(canonical.row(0).collect::<Vec<_>>(), vec![(0, 2.0), (2, 4.0)]);
        assert_eq!(canonical.to_dense(), before);
    }

    #[test]
    fn test_from_parts_cast_integers() {
        let csr = CsrMatrix::<f64>::from_parts_cast(2, 2, vec![0, 1, 2], vec![1, 0], vec![3i32, -7]).unwrap();
        assert_eq!(
            csr.to_dense(),
            DMatrix::from_row_slice(2, 2, &[0.0, 3.0, -7.0, 0.0])
        );
    }

    #[test]
    fn test_coo_to_csr() {
        let mut coo = CooMatrix::new(3, 3);
        coo.push(0, 0, 1.0).unwrap();
        coo.push(0, 2, 2.0).unwrap();
        coo.push(1, 1, 3.0).unwrap();
        coo.push(2, 0, 4.0).unwrap();
        coo.push(2, 2, 5.0).unwrap();
        coo.push(2, 2, 1.0).unwrap();

        let csr = coo.to_csr();
        assert_eq!(csr.nnz(), 5);
        assert!(csr.is_canonical());

        let dense = csr.to_dense();
        assert_eq!(dense[(0, 0)], 1.0);
        assert_eq!(dense[(0, 2)], 2.0);
        assert_eq!(dense[(1, 1)], 3.0);
        assert_eq!(dense[(2, 0)], 4.0);
        assert_eq!(dense[(2, 2)], 6.0);
    }

    #[test]
    fn test_coo_push_out_of_bounds() {
        let mut coo = CooMatrix::<f32>::new(2, 2);
        assert!(coo.push(2, 0, 1.0).is_err());
        assert!(coo.push(0, 2, 1.0).is_err());
    }

    #[test]
    fn test_sum_squares() {
        let dense = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, -2.0, 3.0]);
        let csr = CsrMatrix::from_dense(&dense, 0.0);
        assert_eq!(csr.sum_squares(), 14.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_parts() {
        let csr = CsrMatrix::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 4.0]).unwrap();
        let json = serde_json::to_string(&csr).unwrap();
        let back: CsrMatrix<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, csr);

        let short_row_ptr = r#"{"nrows":2,"ncols":2,"row_ptr":[0],"col_idx":[],"values":[]}"#;
        assert!(serde_json::from_str::<CsrMatrix<f64>>(short_row_ptr).is_err());

        let col_out_of_bounds = r#"{"nrows":1,"ncols":2,"row_ptr":[0,1],"col_idx":[5],"values":[1.0]}"#;
        assert!(serde_json::from_str::<CsrMatrix<f64>>(col_out_of_bounds).is_err());
    }
}
