//! Target matrix representation.
//!
//! A target is either a dense nalgebra matrix or a CSR sparse matrix. Both
//! are real valued; data of other element types is converted on the way in.
//! Quality measures walk a target side by side with a dense estimate without
//! expanding sparse storage.

use crate::{
    error::Result,
    sparse::{check_shape, CooMatrix, CsrMatrix},
    types::{cast_scalar, DMatrix, Scalar},
};
use num_traits::ToPrimitive;
use std::borrow::Cow;

/// A real-valued matrix in dense or compressed-row sparse storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Matrix<T: Scalar> {
    /// Dense column-major storage.
    Dense(DMatrix<T>),
    /// Compressed sparse row storage.
    Sparse(CsrMatrix<T>),
}

impl<T: Scalar> Matrix<T> {
    /// Builds a dense target from a matrix of any primitive numeric type.
    pub fn from_dense_cast<U>(dense: &DMatrix<U>) -> Result<Self>
    where
        U: nalgebra::Scalar + ToPrimitive + Copy,
    {
        let values = dense
            .iter()
            .copied()
            .map(cast_scalar)
            .collect::<Result<Vec<T>>>()?;
        Ok(Matrix::Dense(DMatrix::from_vec(
            dense.nrows(),
            dense.ncols(),
            values,
        )))
    }

    /// Brings the storage to canonical form: sparse rows sorted by column
    /// with repeated entries summed. Dense storage is returned unchanged.
    pub fn normalize(self) -> Self {
        match self {
            Matrix::Dense(m) => Matrix::Dense(m),
            Matrix::Sparse(m) => Matrix::Sparse(m.canonicalize()),
        }
    }

    /// Returns `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.shape(),
            Matrix::Sparse(m) => m.shape(),
        }
    }

    /// Returns the number of rows.
    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    /// Returns the number of columns.
    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    /// Whether the matrix uses sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Dense view of the matrix. Borrows dense storage, expands sparse storage.
    pub fn to_dense(&self) -> Cow<'_, DMatrix<T>> {
        match self {
            Matrix::Dense(m) => Cow::Borrowed(m),
            Matrix::Sparse(m) => Cow::Owned(m.to_dense()),
        }
    }

    /// Returns the sparse storage, if any.
    pub fn as_sparse(&self) -> Option<&CsrMatrix<T>> {
        match self {
            Matrix::Sparse(m) => Some(m),
            Matrix::Dense(_) => None,
        }
    }

    /// Returns the dense storage, if any.
    pub fn as_dense(&self) -> Option<&DMatrix<T>> {
        match self {
            Matrix::Dense(m) => Some(m),
            Matrix::Sparse(_) => None,
        }
    }

    /// Sum of squared elements.
    pub fn sum_squares(&self) -> T {
        match self {
            Matrix::Dense(m) => m.iter().fold(T::zero(), |acc, &v| acc + v * v),
            Matrix::Sparse(m) => m.sum_squares(),
        }
    }

    /// Folds over every `(self[i, j], other[i, j])` pair, implicit sparse
    /// zeros included.
    ///
    /// Fails with `DimensionMismatch` if the shapes differ.
    pub fn fold_with_dense<A, F>(&self, other: &DMatrix<T>, init: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T, T) -> A,
    {
        check_shape(self.shape(), other.shape())?;

        let acc = match self {
            Matrix::Dense(m) => m
                .iter()
                .zip(other.iter())
                .fold(init, |acc, (&a, &b)| f(acc, a, b)),
            Matrix::Sparse(m) => {
                // Rows are scattered into a buffer so unsorted or repeated
                // column indices are handled like `to_dense` handles them.
                let mut acc = init;
                let mut row = vec![T::zero(); m.ncols()];
                for i in 0..m.nrows() {
                    row.iter_mut().for_each(|x| *x = T::zero());
                    for (j, v) in m.row(i) {
                        row[j] = row[j] + v;
                    }
                    for (j, &a) in row.iter().enumerate() {
                        acc = f(acc, a, other[(i, j)]);
                    }
                }
                acc
            }
        };
        Ok(acc)
    }

    /// Elementwise `self - other` as a dense matrix.
    ///
    /// Fails with `DimensionMismatch` if the shapes differ.
    pub fn sub_dense(&self, other: &DMatrix<T>) -> Result<DMatrix<T>> {
        check_shape(self.shape(), other.shape())?;

        let diff = match self {
            Matrix::Dense(m) => m - other,
            Matrix::Sparse(m) => {
                let mut diff = -other.clone();
                for i in 0..m.nrows() {
                    for (j, v) in m.row(i) {
                        diff[(i, j)] = diff[(i, j)] + v;
                    }
                }
                diff
            }
        };
        Ok(diff)
    }
}

impl<T: Scalar> From<DMatrix<T>> for Matrix<T> {
    fn from(m: DMatrix<T>) -> Self {
        Matrix::Dense(m)
    }
}

impl<T: Scalar> From<CsrMatrix<T>> for Matrix<T> {
    fn from(m: CsrMatrix<T>) -> Self {
        Matrix::Sparse(m)
    }
}

impl<T: Scalar> From<CooMatrix<T>> for Matrix<T> {
    fn from(m: CooMatrix<T>) -> Self {
        Matrix::Sparse(m.to_csr())
    }
}
