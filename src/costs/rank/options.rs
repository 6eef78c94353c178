//! costs::rank::options — conventions and configuration for the rank cost.
//!
//! Purpose
//! -------
//! Pin down the three conventions that change the numerical meaning of the
//! rank cost (rank encoding, centering, covariance axis) in a single
//! configuration object, so that a fitted model always states which variant
//! of the statistic it computes.
//!
//! Key behaviors
//! -------------
//! - [`RankEncoding`] selects how sort order becomes a per-observation value.
//! - [`Centering`] selects whether centered ranks keep their continuous value
//!   or are truncated toward zero.
//! - [`CovarianceAxis`] selects whether features (`d × d`) or observations
//!   (`n × n`) are the covariance variables.
//! - [`RankOptions`] bundles the three plus the `verbose` logging switch, with
//!   a recommended [`Default`] and a [`RankOptions::legacy`] preset.
//!
//! Conventions
//! -----------
//! - All enums parse case-insensitively via `FromStr`; unknown names return
//!   [`CostError::InvalidOption`].
//! - `RankOptions::default()` is the statistically meaningful variant:
//!   average ranks, continuous centering, feature covariance.
//! - `RankOptions::legacy()` reproduces the single-argsort, integer-truncated,
//!   observation-covariance computation. Its rank matrix is identically zero,
//!   so every query on a legacy fit reports a singular covariance.
use crate::costs::errors::{CostError, CostResult};
use std::str::FromStr;

/// How the sort order of a feature column is encoded per observation.
///
/// Variants:
/// - `SortPosition`: entry `t` holds the index of the `t`-th smallest value
///   (the raw output of one stable argsort).
/// - `Ordinal`: entry `t` holds the 0-based rank of observation `t`; ties are
///   broken by original order.
/// - `Average`: entry `t` holds the 0-based rank of observation `t`; tied
///   observations share the mean of their positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankEncoding {
    SortPosition,
    Ordinal,
    Average,
}

impl FromStr for RankEncoding {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sort_position" | "sortposition" | "argsort" => Ok(RankEncoding::SortPosition),
            "ordinal" | "first" => Ok(RankEncoding::Ordinal),
            "average" | "mid" => Ok(RankEncoding::Average),
            _ => Err(CostError::InvalidOption {
                name: s.to_string(),
                reason: "Valid rank encodings are 'sort_position', 'ordinal' or 'average'.",
            }),
        }
    }
}

/// What happens to a rank after it is normalized to `[0, 1)` and shifted by
/// `-0.5`.
///
/// Variants:
/// - `Continuous`: keep the centered value in `[-0.5, 0.5)`.
/// - `Truncated`: truncate toward zero, which maps every value to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Centering {
    Continuous,
    Truncated,
}

impl FromStr for Centering {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continuous" => Ok(Centering::Continuous),
            "truncated" | "integer" => Ok(Centering::Truncated),
            _ => Err(CostError::InvalidOption {
                name: s.to_string(),
                reason: "Valid centerings are 'continuous' or 'truncated'.",
            }),
        }
    }
}

/// Which axis of the rank matrix holds the covariance variables.
///
/// Variants:
/// - `Features`: columns are variables; the covariance is `d × d`.
/// - `Observations`: rows are variables; the covariance is `n × n`. Segment
///   queries then only conform when `n == d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovarianceAxis {
    Features,
    Observations,
}

impl FromStr for CovarianceAxis {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "features" | "columns" => Ok(CovarianceAxis::Features),
            "observations" | "rows" => Ok(CovarianceAxis::Observations),
            _ => Err(CostError::InvalidOption {
                name: s.to_string(),
                reason: "Valid covariance axes are 'features' or 'observations'.",
            }),
        }
    }
}

/// RankOptions — configuration for [`CostRank`](crate::costs::rank::CostRank).
///
/// Fields
/// ------
/// - `encoding`: [`RankEncoding`]
/// - `centering`: [`Centering`]
/// - `axis`: [`CovarianceAxis`]
/// - `verbose`: `bool`
///   If `true` and the `obs_slog` feature is enabled, fitting and the first
///   covariance inversion are logged to the terminal.
///
/// Notes
/// -----
/// - The options are copied into the cost model at construction and never
///   change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub encoding: RankEncoding,
    pub centering: Centering,
    pub axis: CovarianceAxis,
    pub verbose: bool,
}

impl RankOptions {
    pub fn new(
        encoding: RankEncoding, centering: Centering, axis: CovarianceAxis, verbose: bool,
    ) -> Self {
        RankOptions { encoding, centering, axis, verbose }
    }

    /// Parse options from their string names, as supplied by the Python layer.
    ///
    /// Errors
    /// ------
    /// - `CostError::InvalidOption` for the first name that does not parse.
    pub fn from_names(
        encoding: &str, centering: &str, axis: &str, verbose: bool,
    ) -> CostResult<Self> {
        Ok(RankOptions::new(encoding.parse()?, centering.parse()?, axis.parse()?, verbose))
    }

    /// Single-argsort, integer-truncated, observation-covariance preset.
    pub fn legacy() -> Self {
        RankOptions {
            encoding: RankEncoding::SortPosition,
            centering: Centering::Truncated,
            axis: CovarianceAxis::Observations,
            verbose: false,
        }
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        RankOptions {
            encoding: RankEncoding::Average,
            centering: Centering::Continuous,
            axis: CovarianceAxis::Features,
            verbose: false,
        }
    }
}
