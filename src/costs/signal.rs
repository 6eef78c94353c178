//! Signal containers for segment cost models.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the `n × d` signal that a cost
//! model is fitted on. This centralizes shape and NaN checks so the rank
//! transform can assume a total order on every column.
//!
//! Key behaviors
//! -------------
//! - [`Signal::from_dyn`] accepts a 1-D or 2-D `ndarray` view; 1-D input is
//!   treated as a single feature (`d = 1`).
//! - Convenience constructors for slices ([`Signal::univariate`]) and owned
//!   matrices ([`Signal::multivariate`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - `n ≥ 1` and `d ≥ 1`.
//! - No entry is NaN. Infinite values are kept; they rank as the extreme
//!   observations of their column.
//! - Rows index observations (time), columns index features.
//!
//! Testing notes
//! -------------
//! - Unit tests cover 1-D reshaping, 2-D passthrough, rejection of 0-D / 3-D
//!   arrays, empty axes and NaN, and acceptance of ±∞.
use crate::costs::errors::{CostError, CostResult};
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix1, Ix2};

/// `Signal` — validated, immutable `n × d` observation matrix.
///
/// Fields
/// ------
/// - `data`: `Array2<f64>`
///   Observations in row-major layout, rows = time, columns = features.
///
/// Invariants
/// ----------
/// - `data.nrows() ≥ 1`, `data.ncols() ≥ 1`, no NaN entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Array2<f64>,
}

impl Signal {
    /// Build a [`Signal`] from a dynamically dimensioned array view.
    ///
    /// Parameters
    /// ----------
    /// - `raw`: `ArrayViewD<'_, f64>`
    ///   Shape `(n,)` or `(n, d)`.
    ///
    /// Returns
    /// -------
    /// `CostResult<Signal>`
    ///   The validated signal; 1-D input becomes an `n × 1` matrix.
    ///
    /// Errors
    /// ------
    /// - `CostError::MalformedShape`
    ///   When `raw.ndim()` is neither 1 nor 2.
    /// - `CostError::EmptySignal`
    ///   When `n == 0` or `d == 0`.
    /// - `CostError::NanData`
    ///   When any entry is NaN; reports the first offending cell in
    ///   row-major order.
    pub fn from_dyn(raw: ArrayViewD<'_, f64>) -> CostResult<Self> {
        let ndim = raw.ndim();
        let data = match ndim {
            1 => {
                let column = raw.into_dimensionality::<Ix1>().map_err(|_| shape_err(ndim))?;
                let n = column.len();
                column.to_owned().into_shape_with_order((n, 1)).map_err(|_| shape_err(ndim))?
            }
            2 => raw.into_dimensionality::<Ix2>().map_err(|_| shape_err(ndim))?.to_owned(),
            _ => return Err(shape_err(ndim)),
        };
        Self::validated(data)
    }

    /// Build a single-feature signal from a slice.
    pub fn univariate(values: &[f64]) -> CostResult<Self> {
        let column = Array2::from_shape_vec((values.len(), 1), values.to_vec())
            .map_err(|_| shape_err(1))?;
        Self::validated(column)
    }

    /// Build a signal from an owned `n × d` matrix.
    pub fn multivariate(data: Array2<f64>) -> CostResult<Self> {
        Self::validated(data)
    }

    /// Number of observations `n`.
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features `d`.
    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// Read-only view of the observations.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    fn validated(data: Array2<f64>) -> CostResult<Self> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(CostError::EmptySignal { n, d });
        }
        if let Some(((row, col), _)) = data.indexed_iter().find(|(_, v)| v.is_nan()) {
            return Err(CostError::NanData { row, col });
        }
        Ok(Signal { data })
    }
}

fn shape_err(ndim: usize) -> CostError {
    CostError::MalformedShape { ndim }
}
