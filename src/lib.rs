//! rust_changepoint — rank-based segment costs for change-point detection.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the segment cost models to Python via the `_rust_changepoint` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing `CostRank` class and the `costs` submodule.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module (`costs`) as the public crate surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for the
//!   `_rust_changepoint` Python extension.
//! - Register the `costs` submodule under `rust_changepoint` in
//!   `sys.modules` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in [`costs`]; this file performs only
//!   FFI glue, input conversion, and error mapping.
//! - The Python-visible `CostRank` mirrors the lifecycle of
//!   [`costs::rank::CostRank`]: construct, `fit` once, then query.
//!
//! Conventions
//! -----------
//! - Segments are 0-based and half-open, exactly as in the Rust API.
//! - Errors from core Rust code are propagated as [`costs::CostError`] and
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`costs`] directly and can ignore the
//!   PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_rust_changepoint` and wraps its
//!   classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core behavior is covered by unit tests in the inner modules and by the
//!   integration and property tests under `tests/`.
//! - The PyO3 layer is exercised from Python.

#[cfg(feature = "obs_slog")]
#[macro_use]
extern crate slog;

pub mod costs;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::PyArray2;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    costs::{
        rank::{cost::CostRank, options::RankOptions},
        traits::{CostKind, CostModel},
    },
    utils::{extract_rank_options, extract_signal, matrix_to_pyarray},
};

/// CostRank — Python-facing wrapper for the rank-based segment cost.
///
/// Purpose
/// -------
/// Expose [`CostRank`] to Python callers with the familiar
/// `fit` / `error` / `sum_of_costs` protocol of change-point cost objects.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `CostRank(encoding="average", centering="continuous", axis="features", verbose=False)`:
/// - `encoding`: `"average" | "ordinal" | "sort_position"`
/// - `centering`: `"continuous" | "truncated"`
/// - `axis`: `"features" | "observations"`
/// - `verbose`: `bool`; logs fit and inversion when built with `obs_slog`.
///
/// `CostRank.legacy()` builds the single-argsort, truncated, observation-axis
/// variant.
///
/// Fields
/// ------
/// - `inner`: [`CostRank`]
///   The Rust cost model.
///
/// Notes
/// -----
/// - `fit` returns the instance itself so calls can be chained.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "CostRank", module = "rust_changepoint.costs")]
pub struct PyCostRank {
    inner: CostRank,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyCostRank {
    #[new]
    #[pyo3(
        signature = (encoding = "average", centering = "continuous", axis = "features", verbose = false),
        text_signature = "(encoding='average', centering='continuous', axis='features', verbose=False)"
    )]
    pub fn new(encoding: &str, centering: &str, axis: &str, verbose: bool) -> PyResult<Self> {
        let options = extract_rank_options(encoding, centering, axis, verbose)?;
        Ok(PyCostRank { inner: CostRank::new(options) })
    }

    #[staticmethod]
    pub fn legacy() -> Self {
        PyCostRank { inner: CostRank::new(RankOptions::legacy()) }
    }

    /// Fit on a 1-D or 2-D signal and return `self`.
    pub fn fit<'py>(
        mut slf: PyRefMut<'py, Self>, signal: &Bound<'py, PyAny>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let signal = extract_signal(signal)?;
        slf.inner.fit_signal(signal)?;
        Ok(slf)
    }

    /// Cost of the segment `[start, end)`.
    pub fn error(&self, start: usize, end: usize) -> PyResult<f64> {
        Ok(self.inner.error(start, end)?)
    }

    /// Total cost of the segmentation ending at each breakpoint.
    pub fn sum_of_costs(&self, bkps: Vec<usize>) -> PyResult<f64> {
        Ok(CostModel::sum_of_costs(&self.inner, &bkps)?)
    }

    #[getter]
    pub fn min_size(&self) -> usize {
        CostModel::min_size(&self.inner)
    }

    #[getter]
    pub fn model(&self) -> &'static str {
        CostModel::model(&self.inner)
    }

    #[getter]
    pub fn is_fitted(&self) -> bool {
        self.inner.is_fitted()
    }

    /// Centered rank matrix, `n × d`.
    #[getter]
    pub fn ranks<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(matrix_to_pyarray(py, self.inner.ranks()?))
    }

    /// Covariance of the rank matrix (`d × d` or `n × n` by axis).
    #[getter]
    pub fn covariance<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        Ok(matrix_to_pyarray(py, self.inner.covariance()?.matrix()))
    }
}

/// Build an unfitted cost object from its identifier (`"rank"`).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "cost_factory")]
fn py_cost_factory(model: &str) -> PyResult<PyCostRank> {
    match model.parse::<CostKind>()? {
        CostKind::Rank => Ok(PyCostRank { inner: CostRank::default() }),
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_changepoint<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let costs_mod = PyModule::new(_py, "costs")?;
    costs(_py, m, &costs_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("rust_changepoint.costs", costs_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn costs<'py>(
    _py: Python, rust_changepoint: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyCostRank>()?;
    m.add_function(wrap_pyfunction!(py_cost_factory, m)?)?;
    rust_changepoint.add_submodule(m)?;
    Ok(())
}
