//! utils — conversion helpers between Python objects and crate types.
//!
//! Only compiled with the `python-bindings` feature. Every helper returns a
//! `PyResult` so the `#[pymethods]` in `lib.rs` can use `?` directly.

#[cfg(feature = "python-bindings")]
use ndarray::{Array2, ArrayView2};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use crate::costs::{rank::options::RankOptions, signal::Signal};

/// Convert a Python signal into a validated [`Signal`].
///
/// Accepts, in order of preference:
/// - a 1-D or 2-D `numpy.ndarray` of `float64`,
/// - any object with `to_numpy()` (pandas `Series` / `DataFrame`),
/// - a flat sequence of floats (one feature),
/// - a sequence of equal-length float sequences (rows = observations).
///
/// Errors
/// ------
/// - `TypeError` when the object is none of the above.
/// - `ValueError` for the signal validation failures of [`Signal::from_dyn`]
///   and for ragged nested sequences.
#[cfg(feature = "python-bindings")]
pub fn extract_signal<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Signal> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(Signal::from_dyn(arr_ro.as_array())?);
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(frame_ro) = obj.extract::<PyReadonlyArrayDyn<f64>>() {
            return Ok(Signal::from_dyn(frame_ro.as_array())?);
        }
    }

    if let Ok(values) = raw_data.extract::<Vec<f64>>() {
        return Ok(Signal::univariate(&values)?);
    }

    let rows: Vec<Vec<f64>> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err(
            "expected a 1-D or 2-D numpy.ndarray, pandas object, or (nested) sequence of float64",
        )
    })?;
    Ok(Signal::multivariate(rows_to_matrix(rows)?)?)
}

/// Parse rank options from the keyword arguments of `CostRank(...)`.
#[cfg(feature = "python-bindings")]
pub fn extract_rank_options(
    encoding: &str, centering: &str, axis: &str, verbose: bool,
) -> PyResult<RankOptions> {
    Ok(RankOptions::from_names(encoding, centering, axis, verbose)?)
}

/// Copy a matrix view into a fresh NumPy array.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_pyarray<'py>(
    py: Python<'py>, matrix: ArrayView2<'_, f64>,
) -> Bound<'py, PyArray2<f64>> {
    matrix.to_owned().into_pyarray(py)
}

#[cfg(feature = "python-bindings")]
fn rows_to_matrix(rows: Vec<Vec<f64>>) -> PyResult<Array2<f64>> {
    let n = rows.len();
    let d = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != d) {
        return Err(PyValueError::new_err("all rows of a nested sequence must have equal length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n, d), flat)
        .map_err(|e| PyValueError::new_err(format!("could not build signal matrix: {e}")))
}
