//! rank — rank-based segment cost.
//!
//! Purpose
//! -------
//! Group the pieces of the rank cost: option types, the per-feature rank
//! transform, the global covariance model with its cached inverse, and the
//! [`CostRank`] evaluator that ties them together.
//!
//! Key behaviors
//! -------------
//! - [`options`] fixes the three conventions that change the statistic
//!   (encoding, centering, covariance axis).
//! - [`transform`] maps an `n × d` signal to centered ranks.
//! - [`covariance`] builds the fixed covariance and inverts it lazily.
//! - [`cost`] answers `error(start, end)` queries against a fitted signal.
//!
//! Downstream usage
//! ----------------
//! - Most callers only need [`CostRank`] and [`RankOptions`], available via
//!   `use rust_changepoint::costs::rank::prelude::*;`.

pub mod cost;
pub mod covariance;
pub mod options;
pub mod transform;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::cost::{CostRank, MIN_SIZE, MODEL};
pub use self::covariance::{CovarianceModel, SINGULAR_RCOND, sample_covariance};
pub use self::options::{Centering, CovarianceAxis, RankEncoding, RankOptions};
pub use self::transform::rank_transform;

pub mod prelude {
    pub use super::cost::CostRank;
    pub use super::options::{Centering, CovarianceAxis, RankEncoding, RankOptions};
}
