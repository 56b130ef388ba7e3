//! Test utilities for factorization models.
//!
//! Seeded generators for non-negative matrices and for exact factor
//! triples `(W, H, V = W·H)`, shared by unit tests, integration tests and
//! benchmarks.

use crate::{
    sparse::CsrMatrix,
    types::{DMatrix, Scalar},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An exact factorization `target = basis · coef`.
#[derive(Debug, Clone)]
pub struct ExactFactors<T: Scalar> {
    /// Basis matrix W (m × k)
    pub basis: DMatrix<T>,
    /// Coefficient matrix H (k × n)
    pub coef: DMatrix<T>,
    /// Product W·H (m × n)
    pub target: DMatrix<T>,
}

/// Random matrix with entries drawn uniformly from `[low, high)`.
pub fn random_uniform<T: Scalar>(
    nrows: usize,
    ncols: usize,
    low: f64,
    high: f64,
    seed: u64,
) -> DMatrix<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    DMatrix::from_fn(nrows, ncols, |_, _| {
        <T as Scalar>::from_f64(rng.gen_range(low..high))
    })
}

/// Random strictly positive matrix, entries in `[0.1, 1.1)`.
pub fn random_positive<T: Scalar>(nrows: usize, ncols: usize, seed: u64) -> DMatrix<T> {
    random_uniform(nrows, ncols, 0.1, 1.1, seed)
}

/// Random non-negative matrix where roughly `density` of the entries are
/// non-zero, returned in CSR form.
pub fn random_sparse<T: Scalar>(
    nrows: usize,
    ncols: usize,
    density: f64,
    seed: u64,
) -> CsrMatrix<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dense = DMatrix::from_fn(nrows, ncols, |_, _| {
        if rng.gen_bool(density.clamp(0.0, 1.0)) {
            <T as Scalar>::from_f64(rng.gen_range(0.1..1.1))
        } else {
            T::zero()
        }
    });
    CsrMatrix::from_dense(&dense, T::zero())
}

/// Exact positive factors of rank `rank` for an `nrows × ncols` target.
pub fn exact_factors<T: Scalar>(
    nrows: usize,
    rank: usize,
    ncols: usize,
    seed: u64,
) -> ExactFactors<T> {
    let basis = random_positive(nrows, rank, seed);
    let coef = random_positive(rank, ncols, seed.wrapping_add(1));
    let target = &basis * &coef;
    ExactFactors {
        basis,
        coef,
        target,
    }
}
