//! costs::errors — unified error type for segment cost models.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by every cost model in
//! this crate, together with the conversion layer to Python exceptions used
//! by the PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`CostError`] and [`CostResult`] as the canonical error and result
//!   types for signal ingestion, fitting, segment queries, and the cost
//!   registry.
//! - Attach human-readable `Display` messages that embed the offending values
//!   (segment bounds, shapes, eigenvalues) so failures are diagnosable without
//!   additional context.
//! - Implement `From<CostError> for PyErr` when the `python-bindings` feature
//!   is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every failure is surfaced synchronously at the offending call; nothing is
//!   logged and suppressed.
//! - `NotEnoughPoints` is always detected before any numerical work, so a
//!   caller may retry with a longer segment against the same fitted model.
//! - `SingularCovariance` is fatal for the fitted instance: the inverse is
//!   memoized, so every later query reports the same failure.
//!
//! Conventions
//! -----------
//! - Variants carry small payloads (indices, dimensions, scalars) and the
//!   enum is `Clone + PartialEq` so it can be memoized and compared in tests.
//! - Messages are phrased in terms of domain constraints ("need at least 2
//!   observations") rather than low-level details.
//!
//! Testing notes
//! -------------
//! - Unit tests check that `Display` messages embed their payloads.
//! - The PyO3 conversion is exercised by Python-level tests.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type CostResult<T> = Result<T, CostError>;

/// CostError — failures raised while fitting or querying a cost model.
///
/// Variants
/// --------
/// - `NotEnoughPoints { start, end, min_size }`
///   The queried segment `[start, end)` is shorter than `min_size`.
/// - `SegmentOutOfBounds { end, n }`
///   The segment end exceeds the number of fitted observations.
/// - `MalformedShape { ndim }`
///   The input signal is neither 1-D nor 2-D.
/// - `EmptySignal { n, d }`
///   The input signal has no observations or no features.
/// - `NanData { row, col }`
///   A signal entry is NaN and therefore has no rank.
/// - `SingularCovariance { dim, min_eigenvalue, max_eigenvalue }`
///   The covariance model cannot be inverted (non-finite entries or an
///   eigenvalue spectrum below the rank tolerance).
/// - `DimensionMismatch { expected, got }`
///   The segment mean vector does not conform with the covariance model.
/// - `NotFitted` / `AlreadyFitted`
///   Lifecycle misuse: query before `fit`, or a second `fit`.
/// - `UnknownModel { name }`
///   The registry has no cost model with this identifier.
/// - `InvalidOption { name, reason }`
///   An option name could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum CostError {
    // ---- Segment queries ----
    NotEnoughPoints { start: usize, end: usize, min_size: usize },
    SegmentOutOfBounds { end: usize, n: usize },

    // ---- Signal ingestion ----
    MalformedShape { ndim: usize },
    EmptySignal { n: usize, d: usize },
    NanData { row: usize, col: usize },

    // ---- Linear algebra ----
    SingularCovariance { dim: usize, min_eigenvalue: f64, max_eigenvalue: f64 },
    DimensionMismatch { expected: usize, got: usize },

    // ---- Lifecycle ----
    NotFitted,
    AlreadyFitted,

    // ---- Registry / options ----
    UnknownModel { name: String },
    InvalidOption { name: String, reason: &'static str },
}

impl std::error::Error for CostError {}

impl std::fmt::Display for CostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Segment queries ----
            CostError::NotEnoughPoints { start, end, min_size } => write!(
                f,
                "NotEnoughPoints: segment [{start}, {end}) needs at least {min_size} observations."
            ),
            CostError::SegmentOutOfBounds { end, n } => {
                write!(f, "Segment end {end} is out of bounds for a signal of length {n}.")
            }

            // ---- Signal ingestion ----
            CostError::MalformedShape { ndim } => {
                write!(f, "Signal must be 1-D or 2-D; got an array with {ndim} dimensions.")
            }
            CostError::EmptySignal { n, d } => {
                write!(f, "Signal must have n ≥ 1 and d ≥ 1; got shape ({n}, {d}).")
            }
            CostError::NanData { row, col } => write!(
                f,
                "Invalid signal value NaN at row {row}, column {col}. NaN cannot be ranked."
            ),

            // ---- Linear algebra ----
            CostError::SingularCovariance { dim, min_eigenvalue, max_eigenvalue } => write!(
                f,
                "Rank covariance ({dim}×{dim}) is singular: eigenvalues span \
                 [{min_eigenvalue:e}, {max_eigenvalue:e}]."
            ),
            CostError::DimensionMismatch { expected, got } => write!(
                f,
                "Dimension mismatch: covariance is {expected}×{expected} but the mean rank \
                 vector has length {got}."
            ),

            // ---- Lifecycle ----
            CostError::NotFitted => write!(f, "Cost model must be fitted before querying."),
            CostError::AlreadyFitted => {
                write!(f, "Cost model is already fitted; create a new instance for a new signal.")
            }

            // ---- Registry / options ----
            CostError::UnknownModel { name } => write!(f, "No cost model named {name:?}."),
            CostError::InvalidOption { name, reason } => {
                write!(f, "Invalid option {name:?}. {reason}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CostError> for PyErr {
    fn from(err: CostError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Payload embedding in `Display` messages for the query, ingestion and
    //   linear-algebra variants.
    //
    // They intentionally DO NOT cover:
    // - The `From<CostError> for PyErr` conversion, which needs the Python C
    //   API and is exercised by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `NotEnoughPoints` names itself and reports the segment and
    // the minimum size.
    //
    // Given
    // -----
    // - `NotEnoughPoints { start: 3, end: 4, min_size: 2 }`.
    //
    // Expect
    // ------
    // - The message contains "NotEnoughPoints", "[3, 4)" and "2".
    fn not_enough_points_includes_segment_and_min_size() {
        // Arrange
        let err = CostError::NotEnoughPoints { start: 3, end: 4, min_size: 2 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("NotEnoughPoints"), "Got: {msg}");
        assert!(msg.contains("[3, 4)"), "Got: {msg}");
        assert!(msg.contains('2'), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `MalformedShape` reports the offending dimensionality.
    //
    // Given
    // -----
    // - `MalformedShape { ndim: 3 }`.
    //
    // Expect
    // ------
    // - The message contains "3".
    fn malformed_shape_includes_ndim() {
        let msg = CostError::MalformedShape { ndim: 3 }.to_string();
        assert!(msg.contains('3'), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `SingularCovariance` reports the matrix dimension.
    //
    // Given
    // -----
    // - A 4×4 singular covariance with a zero spectrum.
    //
    // Expect
    // ------
    // - The message contains "4×4" and "singular".
    fn singular_covariance_includes_dimension() {
        let err = CostError::SingularCovariance { dim: 4, min_eigenvalue: 0.0, max_eigenvalue: 0.0 };
        let msg = err.to_string();
        assert!(msg.contains("4×4"), "Got: {msg}");
        assert!(msg.contains("singular"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Ensure that `NanData` points at the offending cell.
    //
    // Given
    // -----
    // - A NaN at row 7, column 1.
    //
    // Expect
    // ------
    // - The message contains "NaN", "row 7" and "column 1".
    fn nan_data_points_at_cell() {
        let msg = CostError::NanData { row: 7, col: 1 }.to_string();
        assert!(msg.contains("NaN"), "Got: {msg}");
        assert!(msg.contains("row 7"), "Got: {msg}");
        assert!(msg.contains("column 1"), "Got: {msg}");
    }
}
