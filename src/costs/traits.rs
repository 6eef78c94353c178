//! costs::traits — capability interface and registry for segment costs.
//!
//! Purpose
//! -------
//! Describe what a search procedure needs from any segment cost (identifier,
//! minimum segment length, fit, per-segment error, total cost of a
//! segmentation) as one flat trait, and resolve cost models from their
//! symbolic identifiers.
//!
//! Key behaviors
//! -------------
//! - [`CostModel`] is object-safe; `sum_of_costs` is a provided method built
//!   on `error`.
//! - [`CostKind`] enumerates known identifiers and parses them
//!   case-insensitively.
//! - [`cost_factory`] returns a boxed, unfitted model for an identifier.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementors are `Send + Sync`; once fitted, `error` and `sum_of_costs`
//!   only read state.
//! - Breakpoint sequences are not validated here. They are expected to be
//!   strictly increasing and to end at `n`; anything else is reported (or
//!   not) by `error` itself.
use crate::costs::{
    errors::{CostError, CostResult},
    rank::cost::{CostRank, MIN_SIZE, MODEL as RANK_MODEL},
    signal::Signal,
};
use ndarray::ArrayViewD;
use std::str::FromStr;

/// CostModel — segment cost contract consumed by change-point searches.
///
/// Required methods
/// ----------------
/// - `model`: symbolic identifier (e.g. `"rank"`).
/// - `min_size`: shortest admissible segment.
/// - `fit`: ingest a 1-D or 2-D signal once.
/// - `error`: cost of the half-open segment `[start, end)`.
///
/// Provided methods
/// ----------------
/// - `sum_of_costs`: total cost of the segmentation implied by a breakpoint
///   sequence.
pub trait CostModel: Send + Sync {
    fn model(&self) -> &'static str;

    fn min_size(&self) -> usize;

    fn fit(&mut self, signal: ArrayViewD<'_, f64>) -> CostResult<()>;

    fn error(&self, start: usize, end: usize) -> CostResult<f64>;

    /// Sum of segment costs over `[0, b₀), [b₀, b₁), …`.
    ///
    /// Parameters
    /// ----------
    /// - `breakpoints`: `&[usize]`
    ///   Segment ends, conventionally strictly increasing and ending at `n`.
    ///
    /// Returns
    /// -------
    /// `CostResult<f64>`
    ///   The total cost; `0.0` for an empty sequence.
    ///
    /// Errors
    /// ------
    /// - The first error returned by [`CostModel::error`].
    fn sum_of_costs(&self, breakpoints: &[usize]) -> CostResult<f64> {
        let mut start = 0;
        let mut total = 0.0;
        for &end in breakpoints {
            total += self.error(start, end)?;
            start = end;
        }
        Ok(total)
    }
}

impl CostModel for CostRank {
    fn model(&self) -> &'static str {
        RANK_MODEL
    }

    fn min_size(&self) -> usize {
        MIN_SIZE
    }

    fn fit(&mut self, signal: ArrayViewD<'_, f64>) -> CostResult<()> {
        self.fit_signal(Signal::from_dyn(signal)?)
    }

    fn error(&self, start: usize, end: usize) -> CostResult<f64> {
        CostRank::error(self, start, end)
    }
}

/// Known cost identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostKind {
    Rank,
}

impl CostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CostKind::Rank => RANK_MODEL,
        }
    }

    /// Unfitted model of this kind with default options.
    pub fn build(self) -> Box<dyn CostModel> {
        match self {
            CostKind::Rank => Box::new(CostRank::default()),
        }
    }
}

impl FromStr for CostKind {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rank" => Ok(CostKind::Rank),
            _ => Err(CostError::UnknownModel { name: s.to_string() }),
        }
    }
}

/// Build an unfitted cost model from its identifier.
///
/// Errors
/// ------
/// - `CostError::UnknownModel` when `model` names no known cost.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_changepoint::costs::traits::cost_factory;
/// let mut cost = cost_factory("rank")?;
/// cost.fit(array![1.0, 5.0, 2.0, 6.0, 3.0, 4.0].view().into_dyn())?;
/// assert_eq!(cost.min_size(), 2);
/// assert!(cost.sum_of_costs(&[2, 4, 6])? <= 0.0);
/// # Ok::<(), rust_changepoint::costs::errors::CostError>(())
/// ```
pub fn cost_factory(model: &str) -> CostResult<Box<dyn CostModel>> {
    Ok(model.parse::<CostKind>()?.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `sum_of_costs` against explicit sums of `error`, the empty sequence
    //   and error propagation.
    // - `cost_factory` and `CostKind` parsing.
    // -------------------------------------------------------------------------

    fn fitted_rank() -> Box<dyn CostModel> {
        let mut cost = cost_factory("rank").expect("rank is registered");
        cost.fit(array![1.0, 5.0, 2.0, 6.0, 3.0, 4.0].view().into_dyn())
            .expect("fit should succeed");
        cost
    }

    #[test]
    // Purpose
    // -------
    // Verify that `sum_of_costs` pairs consecutive boundaries starting at 0.
    //
    // Given
    // -----
    // - The fitted series [1, 5, 2, 6, 3, 4] and breakpoints [2, 4, 6].
    //
    // Expect
    // ------
    // - error(0, 2) + error(2, 4) + error(4, 6) = −2/21 + 0 − 1/42 = −5/42.
    fn sum_of_costs_adds_consecutive_segments() {
        // Arrange
        let cost = fitted_rank();

        // Act
        let total = cost.sum_of_costs(&[2, 4, 6]).expect("valid breakpoints");
        let manual: f64 = [(0, 2), (2, 4), (4, 6)]
            .iter()
            .map(|&(a, b)| cost.error(a, b).expect("valid segment"))
            .sum();

        // Assert
        assert_relative_eq!(total, manual, epsilon = 1e-15);
        assert_relative_eq!(total, -5.0 / 42.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Check the empty sequence and propagation of the first failure.
    //
    // Given
    // -----
    // - Breakpoints [] and [3, 4, 6] (the middle segment has one point).
    //
    // Expect
    // ------
    // - 0.0 for the empty sequence.
    // - `NotEnoughPoints { start: 3, end: 4, .. }` for the second.
    fn sum_of_costs_handles_empty_and_errors() {
        let cost = fitted_rank();

        assert_eq!(cost.sum_of_costs(&[]), Ok(0.0));
        assert_eq!(
            cost.sum_of_costs(&[3, 4, 6]),
            Err(CostError::NotEnoughPoints { start: 3, end: 4, min_size: 2 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Ensure the registry resolves "rank" in any case and rejects others.
    //
    // Expect
    // ------
    // - `model() == "rank"`, `min_size() == 2`.
    // - `UnknownModel { name: "l2" }` for an unregistered identifier.
    fn factory_resolves_known_models_only() {
        let cost = cost_factory("RANK").expect("identifiers are case-insensitive");
        assert_eq!(cost.model(), "rank");
        assert_eq!(cost.min_size(), 2);
        assert_eq!(CostKind::Rank.as_str(), "rank");

        match cost_factory("l2") {
            Err(CostError::UnknownModel { name }) => assert_eq!(name, "l2"),
            Err(other) => panic!("expected UnknownModel, got {other:?}"),
            Ok(_) => panic!("expected UnknownModel, got a model"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `fit` through the trait validates the raw array.
    //
    // Given
    // -----
    // - A 1-D input containing NaN.
    //
    // Expect
    // ------
    // - `NanData` and the model stays unfitted.
    fn trait_fit_validates_input() {
        let mut cost = cost_factory("rank").expect("rank is registered");

        let err = cost.fit(array![1.0, f64::NAN, 2.0].view().into_dyn()).expect_err("NaN input");

        assert!(matches!(err, CostError::NanData { row: 1, col: 0 }));
        assert_eq!(cost.error(0, 2), Err(CostError::NotFitted));
    }
}
