//! costs::rank::cost — rank-based segment cost evaluator.
//!
//! Purpose
//! -------
//! Fit a signal once (rank transform + global covariance) and then answer
//! many segment-cost queries cheaply. The cost of `[start, end)` is
//!
//! ```text
//! c(start, end) = −(end − start) · r̄ᵀ Σ⁻¹ r̄ / n
//! ```
//!
//! where `r̄` is the mean rank vector over the segment, `Σ` is the covariance
//! of the full rank matrix, and `n` is the signal length.
//!
//! Key behaviors
//! -------------
//! - [`CostRank::fit_signal`] takes an already validated [`Signal`], builds
//!   the rank matrix and the [`CovarianceModel`], and stores them for the
//!   lifetime of the instance.
//! - [`CostRank::error`] checks its arguments before any numerical work, then
//!   computes the segment mean and the quadratic form against the memoized
//!   inverse.
//! - With `verbose` and the `obs_slog` feature, fitting and the first inversion
//!   are logged to the terminal.
//!
//! Invariants & assumptions
//! ------------------------
//! - A fitted instance is read-only; `error` takes `&self` and is safe to call
//!   from several threads at once.
//! - Check order in `error`: `NotFitted`, `NotEnoughPoints`,
//!   `SegmentOutOfBounds`, `DimensionMismatch`, `SingularCovariance`.
//! - An invertible covariance has a positive spectrum, so every cost is `≤ 0`.
//!
//! Conventions
//! -----------
//! - Segments are half-open and 0-based.
//! - A second `fit` is rejected with `AlreadyFitted`; build a new instance
//!   for a new signal.
//!
//! Downstream usage
//! ----------------
//! - Search procedures call `error` or `sum_of_costs` (via
//!   [`CostModel`](crate::costs::traits::CostModel)) on candidate segments
//!   and never touch the rank matrix directly.
//!
//! Testing notes
//! -------------
//! - Unit tests pin closed-form costs on a small univariate signal, check
//!   every error branch and the lazy inverse, and verify invariance to
//!   monotone transforms.
use crate::costs::{
    errors::{CostError, CostResult},
    rank::{covariance::CovarianceModel, options::RankOptions, transform::rank_transform},
    signal::Signal,
};
use ndarray::{Array1, Array2, ArrayView2, Axis, s};

/// Shortest segment the rank cost accepts.
pub const MIN_SIZE: usize = 2;

/// Registry identifier of the rank cost.
pub const MODEL: &str = "rank";

/// State produced by a successful fit.
#[derive(Debug, Clone)]
struct FittedRank {
    signal: Signal,
    ranks: Array2<f64>,
    covariance: CovarianceModel,
}

/// CostRank — rank-based cost for change-point segmentation.
///
/// Fields
/// ------
/// - `options`: [`RankOptions`]
///   Rank encoding, centering, covariance axis and verbosity.
/// - `fitted`: `Option<FittedRank>`
///   `None` until [`CostRank::fit_signal`] succeeds.
/// - `logger`: `Option<slog::Logger>` (feature `obs_slog`)
///   Terminal logger, present only when `options.verbose` is set.
///
/// Examples
/// --------
/// ```rust
/// # use rust_changepoint::costs::rank::CostRank;
/// # use rust_changepoint::costs::signal::Signal;
/// let mut cost = CostRank::default();
/// cost.fit_signal(Signal::univariate(&[1.0, 5.0, 2.0, 6.0, 3.0, 4.0])?)?;
/// let c = cost.error(0, 2)?;
/// assert!(c.is_finite() && c <= 0.0);
/// # Ok::<(), rust_changepoint::costs::errors::CostError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CostRank {
    options: RankOptions,
    fitted: Option<FittedRank>,
    #[cfg(feature = "obs_slog")]
    logger: Option<slog::Logger>,
}

impl CostRank {
    pub fn new(options: RankOptions) -> Self {
        CostRank {
            options,
            fitted: None,
            #[cfg(feature = "obs_slog")]
            logger: options.verbose.then(terminal_logger),
        }
    }

    /// Unfitted cost with [`RankOptions::legacy`].
    pub fn legacy() -> Self {
        CostRank::new(RankOptions::legacy())
    }

    pub fn options(&self) -> RankOptions {
        self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit the cost on a validated signal.
    ///
    /// Parameters
    /// ----------
    /// - `signal`: [`Signal`]
    ///   Validated `n × d` observations; ownership moves into the model.
    ///
    /// Errors
    /// ------
    /// - `CostError::AlreadyFitted`
    ///   If this instance already holds a fitted signal.
    ///
    /// Notes
    /// -----
    /// - The covariance is not inverted here; an ill-conditioned covariance
    ///   is only reported by the first query.
    pub fn fit_signal(&mut self, signal: Signal) -> CostResult<()> {
        if self.fitted.is_some() {
            return Err(CostError::AlreadyFitted);
        }
        let ranks = rank_transform(signal.view(), self.options.encoding, self.options.centering);
        let covariance = CovarianceModel::from_ranks(ranks.view(), self.options.axis);
        let fitted = FittedRank { signal, ranks, covariance };

        #[cfg(feature = "obs_slog")]
        if let Some(logger) = &self.logger {
            log_fit(logger, &fitted, &self.options);
        }

        self.fitted = Some(fitted);
        Ok(())
    }

    /// Number of fitted observations `n`.
    pub fn n_samples(&self) -> CostResult<usize> {
        Ok(self.state()?.signal.n_samples())
    }

    pub fn signal(&self) -> CostResult<&Signal> {
        Ok(&self.state()?.signal)
    }

    /// Centered rank matrix of the fitted signal.
    pub fn ranks(&self) -> CostResult<ArrayView2<'_, f64>> {
        Ok(self.state()?.ranks.view())
    }

    pub fn covariance(&self) -> CostResult<&CovarianceModel> {
        Ok(&self.state()?.covariance)
    }

    /// Cost of the half-open segment `[start, end)`.
    ///
    /// Parameters
    /// ----------
    /// - `start`: `usize`
    ///   First observation of the segment.
    /// - `end`: `usize`
    ///   One past the last observation of the segment.
    ///
    /// Returns
    /// -------
    /// `CostResult<f64>`
    ///   `−(end − start) · r̄ᵀ Σ⁻¹ r̄ / n`.
    ///
    /// Errors
    /// ------
    /// - `CostError::NotFitted`
    ///   Before a successful fit.
    /// - `CostError::NotEnoughPoints`
    ///   If `end − start < MIN_SIZE` (including `end < start`).
    /// - `CostError::SegmentOutOfBounds`
    ///   If `end > n`.
    /// - `CostError::DimensionMismatch`
    ///   If the covariance dimension differs from `d`, which happens under
    ///   the observation axis whenever `n ≠ d`.
    /// - `CostError::SingularCovariance`
    ///   If the covariance cannot be inverted. Memoized, so every later query
    ///   on this instance reports it too.
    pub fn error(&self, start: usize, end: usize) -> CostResult<f64> {
        let fitted = self.state()?;
        if end.saturating_sub(start) < MIN_SIZE {
            return Err(CostError::NotEnoughPoints { start, end, min_size: MIN_SIZE });
        }
        let n = fitted.ranks.nrows();
        if end > n {
            return Err(CostError::SegmentOutOfBounds { end, n });
        }
        let k = fitted.covariance.dim();
        let d = fitted.ranks.ncols();
        if k != d {
            return Err(CostError::DimensionMismatch { expected: k, got: d });
        }

        let inverse = self.inverse(fitted)?;
        let mean = segment_mean(fitted.ranks.slice(s![start..end, ..]));
        let quad_form = mean.dot(&inverse.dot(&mean));
        Ok(-((end - start) as f64) * quad_form / n as f64)
    }

    // ---- Helper methods ----

    fn state(&self) -> CostResult<&FittedRank> {
        self.fitted.as_ref().ok_or(CostError::NotFitted)
    }

    fn inverse<'a>(&self, fitted: &'a FittedRank) -> CostResult<&'a Array2<f64>> {
        #[cfg(feature = "obs_slog")]
        let first_inversion = !fitted.covariance.is_inverse_cached();

        let inverse = fitted.covariance.inverse();

        #[cfg(feature = "obs_slog")]
        if first_inversion && let Some(logger) = &self.logger {
            log_inversion(logger, fitted.covariance.dim(), &inverse);
        }

        inverse
    }
}

impl Default for CostRank {
    fn default() -> Self {
        CostRank::new(RankOptions::default())
    }
}

fn segment_mean(segment: ArrayView2<'_, f64>) -> Array1<f64> {
    segment.sum_axis(Axis(0)) / segment.nrows() as f64
}

#[cfg(feature = "obs_slog")]
fn terminal_logger() -> slog::Logger {
    use slog::Drain;

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    slog::Logger::root(drain, o!("cost" => MODEL))
}

#[cfg(feature = "obs_slog")]
fn log_fit(logger: &slog::Logger, fitted: &FittedRank, options: &RankOptions) {
    info!(logger, "fitted";
        "n" => fitted.signal.n_samples(),
        "d" => fitted.signal.n_features(),
        "encoding" => ?options.encoding,
        "centering" => ?options.centering,
        "axis" => ?options.axis,
        "cov_dim" => fitted.covariance.dim()
    );
}

#[cfg(feature = "obs_slog")]
fn log_inversion(logger: &slog::Logger, dim: usize, outcome: &CostResult<&Array2<f64>>) {
    match outcome {
        Ok(_) => info!(logger, "covariance inverted"; "dim" => dim),
        Err(err) => warn!(logger, "covariance inversion failed"; "dim" => dim, "error" => %err),
    }
}
