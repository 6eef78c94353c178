//! costs — segment cost models for change-point detection.
//!
//! Purpose
//! -------
//! Provide the cost functions that change-point searches minimize. A cost
//! model is fitted once on a full signal and then evaluates arbitrary
//! contiguous segments `[start, end)` without recomputing global statistics.
//!
//! Key behaviors
//! -------------
//! - Define the shared error surface, [`CostError`] and [`CostResult`].
//! - Validate raw 1-D / 2-D input into a [`Signal`].
//! - Expose the [`CostModel`] capability trait, its provided
//!   `sum_of_costs`, and the [`cost_factory`] registry.
//! - Implement the rank-based cost in [`rank`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Signals are `n × d` with rows as time; 1-D input is a single feature.
//! - Segments are half-open and 0-based; breakpoint sequences end at `n`.
//! - Fitted models are immutable and may be shared across threads.
//!
//! Conventions
//! -----------
//! - Costs are lower for segments that look more homogeneous to the model;
//!   the rank cost is non-positive.
//! - Nothing in this module performs I/O. Logging is opt-in through the
//!   `obs_slog` feature and the model's `verbose` option.
//!
//! Downstream usage
//! ----------------
//! - `use rust_changepoint::costs::prelude::*;` brings the trait, the
//!   registry, the rank cost and its options into scope.

pub mod errors;
pub mod rank;
pub mod signal;
pub mod traits;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{CostError, CostResult};
pub use self::signal::Signal;
pub use self::traits::{CostKind, CostModel, cost_factory};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::errors::{CostError, CostResult};
    pub use super::rank::prelude::*;
    pub use super::signal::Signal;
    pub use super::traits::{CostKind, CostModel, cost_factory};
}
