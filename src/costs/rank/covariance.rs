//! costs::rank::covariance — global rank covariance and its cached inverse.
//!
//! Purpose
//! -------
//! Derive the fixed covariance matrix of the full rank signal once per fit and
//! provide its inverse to every segment query, computing the inverse lazily
//! on first use and memoizing it for the lifetime of the fitted model.
//!
//! Key behaviors
//! -------------
//! - [`sample_covariance`] computes the unbiased sample covariance of a rank
//!   matrix along the configured [`CovarianceAxis`].
//! - [`CovarianceModel`] owns the matrix and a `OnceLock` holding the result
//!   of the inversion (success or failure), so concurrent readers share one
//!   computation.
//! - Inversion uses a symmetric eigendecomposition in `nalgebra`; the matrix
//!   is rejected as singular instead of pseudo-inverted.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fitting never fails on ill-conditioned input; singularity is reported
//!   only by [`CovarianceModel::inverse`].
//! - A matrix is singular when any entry is non-finite, when its spectral
//!   scale `max|λ|` is within rounding noise of zero (`k · ε · 0.25`, with
//!   `0.25` the largest variance of a centered rank), or when
//!   `λ_min ≤ SINGULAR_RCOND · max|λ|`.
//! - The memoized result never changes after it is first set.
//!
//! Conventions
//! -----------
//! - Denominator is (samples per variable − 1). With a single sample per
//!   variable every entry is `0/0 = NaN`, which surfaces as a singular
//!   covariance at query time.
//! - `Features`: columns are variables, result is `d × d`.
//! - `Observations`: rows are variables, result is `n × n`.
//!
//! Testing notes
//! -------------
//! - Unit tests check both axes against hand-computed covariances, the
//!   inverse against the identity, singular and non-finite rejection, and
//!   that the inverse is computed lazily.
use crate::costs::{
    errors::{CostError, CostResult},
    rank::options::CovarianceAxis,
};
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2, Axis};
use std::sync::OnceLock;

/// Relative eigenvalue floor below which the covariance counts as singular.
pub const SINGULAR_RCOND: f64 = 1e-10;

/// Upper bound on the variance of a centered rank in `[-0.5, 0.5)`.
const RANK_VARIANCE_BOUND: f64 = 0.25;

/// CovarianceModel — fixed covariance of the rank signal plus cached inverse.
///
/// Fields
/// ------
/// - `matrix`: `Array2<f64>`
///   Symmetric `k × k` sample covariance (`k = d` or `k = n`).
/// - `axis`: [`CovarianceAxis`]
///   The axis convention the matrix was built with.
/// - `inverse`: `OnceLock<CostResult<Array2<f64>>>`
///   Memoized inversion outcome; empty until the first query.
#[derive(Debug, Clone)]
pub struct CovarianceModel {
    matrix: Array2<f64>,
    axis: CovarianceAxis,
    inverse: OnceLock<CostResult<Array2<f64>>>,
}

impl CovarianceModel {
    /// Build the covariance model of a rank matrix.
    pub fn from_ranks(ranks: ArrayView2<'_, f64>, axis: CovarianceAxis) -> Self {
        CovarianceModel { matrix: sample_covariance(ranks, axis), axis, inverse: OnceLock::new() }
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    /// Side length `k` of the square covariance matrix.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn axis(&self) -> CovarianceAxis {
        self.axis
    }

    /// Whether the inversion has already been attempted.
    pub fn is_inverse_cached(&self) -> bool {
        self.inverse.get().is_some()
    }

    /// Return the inverse covariance, computing it on first call.
    ///
    /// Returns
    /// -------
    /// `CostResult<&Array2<f64>>`
    ///   Borrow of the memoized inverse.
    ///
    /// Errors
    /// ------
    /// - `CostError::SingularCovariance`
    ///   When the matrix is non-finite or numerically singular. The failure
    ///   is memoized as well, so later calls return it without recomputing.
    pub fn inverse(&self) -> CostResult<&Array2<f64>> {
        self.inverse.get_or_init(|| invert_symmetric(&self.matrix)).as_ref().map_err(Clone::clone)
    }
}

/// Unbiased sample covariance of a rank matrix along `axis`.
///
/// Parameters
/// ----------
/// - `ranks`: `ArrayView2<'_, f64>`
///   `n × d` rank matrix.
/// - `axis`: [`CovarianceAxis`]
///   `Features` treats columns as variables (`d × d` result); `Observations`
///   treats rows as variables (`n × n` result).
///
/// Returns
/// -------
/// `Array2<f64>`
///   Symmetric covariance matrix. Entries are NaN when each variable has a
///   single sample.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_changepoint::costs::rank::covariance::sample_covariance;
/// # use rust_changepoint::costs::rank::options::CovarianceAxis;
/// let r = array![[-0.5, 0.25], [0.0, -0.25], [0.5, 0.0]];
/// let cov = sample_covariance(r.view(), CovarianceAxis::Features);
/// assert_eq!(cov.dim(), (2, 2));
/// assert!((cov[[0, 0]] - 0.25).abs() < 1e-12);
/// ```
pub fn sample_covariance(ranks: ArrayView2<'_, f64>, axis: CovarianceAxis) -> Array2<f64> {
    // Orient so that rows are samples and columns are variables.
    let samples = match axis {
        CovarianceAxis::Features => ranks,
        CovarianceAxis::Observations => ranks.reversed_axes(),
    };
    let n_samples = samples.nrows();
    let means = samples.sum_axis(Axis(0)) / n_samples as f64;
    let centered = &samples - &means;
    let denominator = n_samples as f64 - 1.0;
    centered.t().dot(&centered) / denominator
}

// ---- Helper methods ----

/// Invert a symmetric matrix through `Q Λ⁻¹ Qᵀ`, rejecting singular input.
fn invert_symmetric(matrix: &Array2<f64>) -> CostResult<Array2<f64>> {
    let k = matrix.nrows();
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(CostError::SingularCovariance {
            dim: k,
            min_eigenvalue: f64::NAN,
            max_eigenvalue: f64::NAN,
        });
    }

    let mut matrix_nalg = DMatrix::<f64>::zeros(k, k);
    fill_dmatrix(matrix, &mut matrix_nalg);
    let eigen_decomp = matrix_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;

    let min_eigenvalue = eigenvals.iter().copied().fold(f64::INFINITY, f64::min);
    let max_eigenvalue = eigenvals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = eigenvals.iter().fold(0.0_f64, |acc, lambda| acc.max(lambda.abs()));
    // Constant columns leave O(ε²) residue from mean subtraction, not an exact 0.
    let noise_floor = k as f64 * f64::EPSILON * RANK_VARIANCE_BOUND;
    if scale <= noise_floor || min_eigenvalue <= SINGULAR_RCOND * scale {
        return Err(CostError::SingularCovariance { dim: k, min_eigenvalue, max_eigenvalue });
    }

    let mut inverse = Array2::<f64>::zeros((k, k));
    for i in 0..k {
        for j in i..k {
            let value: f64 = eigenvals
                .iter()
                .enumerate()
                .map(|(m, &lambda)| q[(i, m)] * q[(j, m)] / lambda)
                .sum();
            inverse[[i, j]] = value;
            inverse[[j, i]] = value;
        }
    }
    Ok(inverse)
}

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &value) in src.indexed_iter() {
        dst[(i, j)] = value;
    }
}
