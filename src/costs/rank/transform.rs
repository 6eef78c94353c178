//! costs::rank::transform — per-feature centered rank transform.
//!
//! Purpose
//! -------
//! Replace every observation of a signal by a centered value derived from its
//! sort order within its own feature column. The result is invariant to any
//! strictly increasing transform of a column, which is what makes the rank
//! cost robust to outliers and distributional shape.
//!
//! Key behaviors
//! -------------
//! - Columns are transformed independently.
//! - A 0-based position `r` is computed with the configured
//!   [`RankEncoding`], normalized to `r / n ∈ [0, 1)`, then shifted by
//!   `-0.5` into `[-0.5, 0.5)`.
//! - With [`Centering::Truncated`] the shifted value is truncated toward zero
//!   (integer coercion), which maps every entry to `0`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input is a validated [`Signal`](crate::costs::signal::Signal) view: no
//!   NaNs, so comparisons are total. ±∞ rank as the extremes of a column and
//!   equal infinities tie.
//! - Output has the same shape as the input.
//! - With `Ordinal` or `SortPosition` encodings each column of the output is
//!   a permutation of `{k/n − 0.5 : k = 0..n}`, so the full-signal column
//!   mean is exactly `-1/(2n)`.
//!
//! Conventions
//! -----------
//! - `Ordinal` and `Average` ranks come from `statrs` (1-based) and are
//!   shifted down by one.
//! - `SortPosition` uses a stable sort, so ties keep their original order.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each encoding on a small hand-checked column, ties,
//!   truncation, column independence, and monotone invariance.
use crate::costs::rank::options::{Centering, RankEncoding};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker};

/// Compute the centered rank matrix of an `n × d` signal.
///
/// Parameters
/// ----------
/// - `signal`: `ArrayView2<'_, f64>`
///   NaN-free observations, rows = time, columns = features.
/// - `encoding`: [`RankEncoding`]
///   How sort order becomes a per-observation position.
/// - `centering`: [`Centering`]
///   Whether the centered value is kept or truncated toward zero.
///
/// Returns
/// -------
/// `Array2<f64>`
///   Rank matrix with the same shape as `signal`.
///
/// Panics
/// ------
/// - Never panics for validated signals.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use rust_changepoint::costs::rank::options::{Centering, RankEncoding};
/// # use rust_changepoint::costs::rank::transform::rank_transform;
/// let x = array![[10.0], [30.0], [20.0], [40.0]];
/// let r = rank_transform(x.view(), RankEncoding::Ordinal, Centering::Continuous);
/// assert_eq!(r.column(0).to_vec(), vec![-0.5, 0.0, -0.25, 0.25]);
/// ```
pub fn rank_transform(
    signal: ArrayView2<'_, f64>, encoding: RankEncoding, centering: Centering,
) -> Array2<f64> {
    let n = signal.nrows();
    let mut ranks = Array2::<f64>::zeros(signal.raw_dim());
    for (j, column) in signal.axis_iter(Axis(1)).enumerate() {
        let positions = column_positions(column, encoding);
        for (t, position) in positions.into_iter().enumerate() {
            ranks[[t, j]] = center(position, n, centering);
        }
    }
    ranks
}

// ---- Helper methods ----

/// 0-based sort positions of one column under the given encoding.
fn column_positions(column: ArrayView1<'_, f64>, encoding: RankEncoding) -> Vec<f64> {
    match encoding {
        RankEncoding::SortPosition => {
            stable_argsort(column).into_iter().map(|idx| idx as f64).collect()
        }
        RankEncoding::Ordinal => zero_based_ranks(column, RankTieBreaker::First),
        RankEncoding::Average => zero_based_ranks(column, RankTieBreaker::Average),
    }
}

fn stable_argsort(column: ArrayView1<'_, f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..column.len()).collect();
    order.sort_by(|&a, &b| column[a].total_cmp(&column[b]));
    order
}

fn zero_based_ranks(column: ArrayView1<'_, f64>, tie_breaker: RankTieBreaker) -> Vec<f64> {
    // statrs finds ties by subtraction, and ∞ − ∞ is NaN.
    let values = if column.iter().any(|v| v.is_infinite()) {
        dense_order_keys(column)
    } else {
        column.to_vec()
    };
    let mut data = Data::new(values);
    data.ranks(tie_breaker).into_iter().map(|rank| rank - 1.0).collect()
}

/// Replace each value by the index of its distinct value in sorted order.
fn dense_order_keys(column: ArrayView1<'_, f64>) -> Vec<f64> {
    let mut distinct = column.to_vec();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup_by(|a, b| a == b);
    column.iter().map(|v| distinct.partition_point(|d| d < v) as f64).collect()
}

fn center(position: f64, n: usize, centering: Centering) -> f64 {
    let centered = position / n as f64 - 0.5;
    match centering {
        Centering::Continuous => centered,
        // + 0.0 folds -0.0 into 0.0
        Centering::Truncated => centered.trunc() + 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Each `RankEncoding` on a hand-checked column.
    // - Tie handling for `Ordinal` (original order) and `Average` (mid-ranks).
    // - `Centering::Truncated` collapsing every value to zero.
    // - Independence of columns and invariance to monotone transforms.
    // - Infinite values, including repeated ones.
    // -------------------------------------------------------------------------

    const TOL: f64 = 1e-12;

    fn assert_column(actual: &Array2<f64>, col: usize, expected: &[f64]) {
        assert_eq!(actual.nrows(), expected.len());
        for (t, &e) in expected.iter().enumerate() {
            assert_relative_eq!(actual[[t, col]], e, epsilon = TOL);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify true ranks on a column with distinct values.
    //
    // Given
    // -----
    // - x = [1, 5, 2, 6, 3, 4] (n = 6), whose 0-based ranks are
    //   [0, 4, 1, 5, 2, 3].
    //
    // Expect
    // ------
    // - Centered values r/6 − 0.5 for both `Ordinal` and `Average`.
    fn ordinal_and_average_agree_without_ties() {
        // Arrange
        let x = array![[1.0], [5.0], [2.0], [6.0], [3.0], [4.0]];
        let expected: Vec<f64> =
            [0.0, 4.0, 1.0, 5.0, 2.0, 3.0].iter().map(|r| r / 6.0 - 0.5).collect();

        // Act
        let ordinal = rank_transform(x.view(), RankEncoding::Ordinal, Centering::Continuous);
        let average = rank_transform(x.view(), RankEncoding::Average, Centering::Continuous);

        // Assert
        assert_column(&ordinal, 0, &expected);
        assert_column(&average, 0, &expected);
    }

    #[test]
    // Purpose
    // -------
    // Verify that `SortPosition` stores argsort output rather than ranks.
    //
    // Given
    // -----
    // - x = [1, 5, 2, 6, 3, 4]; argsort = [0, 2, 4, 5, 1, 3].
    //
    // Expect
    // ------
    // - Centered argsort indices, which differ from the true ranks.
    fn sort_position_stores_argsort_indices() {
        let x = array![[1.0], [5.0], [2.0], [6.0], [3.0], [4.0]];
        let expected: Vec<f64> =
            [0.0, 2.0, 4.0, 5.0, 1.0, 3.0].iter().map(|r| r / 6.0 - 0.5).collect();

        let ranks = rank_transform(x.view(), RankEncoding::SortPosition, Centering::Continuous);

        assert_column(&ranks, 0, &expected);
    }

    #[test]
    // Purpose
    // -------
    // Check tie handling for both true-rank encodings.
    //
    // Given
    // -----
    // - x = [2, 1, 2, 2] (n = 4).
    //
    // Expect
    // ------
    // - `Ordinal`: ranks [1, 0, 2, 3] (ties in original order).
    // - `Average`: ranks [2, 0, 2, 2] (mean of positions 1, 2, 3).
    fn ties_follow_tie_breaker() {
        let x = array![[2.0], [1.0], [2.0], [2.0]];

        let ordinal = rank_transform(x.view(), RankEncoding::Ordinal, Centering::Continuous);
        let average = rank_transform(x.view(), RankEncoding::Average, Centering::Continuous);

        assert_column(&ordinal, 0, &[-0.25, -0.5, 0.0, 0.25]);
        assert_column(&average, 0, &[0.0, -0.5, 0.0, 0.0]);
    }

    #[test]
    // Purpose
    // -------
    // Ensure that a constant column collapses to a constant rank column
    // under average ranks.
    //
    // Given
    // -----
    // - x = [3, 3, 3, 3].
    //
    // Expect
    // ------
    // - Every rank equals 1.5/4 − 0.5 = −0.125.
    fn constant_column_has_constant_average_rank() {
        let x = array![[3.0], [3.0], [3.0], [3.0]];

        let ranks = rank_transform(x.view(), RankEncoding::Average, Centering::Continuous);

        assert_column(&ranks, 0, &[-0.125; 4]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that truncated centering maps every value to exactly zero.
    //
    // Given
    // -----
    // - A 5×2 signal, every encoding.
    //
    // Expect
    // ------
    // - All entries are 0.0 and none is negative zero.
    fn truncated_centering_collapses_to_zero() {
        let x = array![[5.0, 1.0], [4.0, 2.0], [3.0, 3.0], [2.0, 4.0], [1.0, 5.0]];

        for encoding in [RankEncoding::SortPosition, RankEncoding::Ordinal, RankEncoding::Average] {
            let ranks = rank_transform(x.view(), encoding, Centering::Truncated);
            assert!(ranks.iter().all(|&v| v == 0.0 && v.is_sign_positive()), "{ranks:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Check that columns are transformed independently and that a strictly
    // increasing map leaves the ranks unchanged.
    //
    // Given
    // -----
    // - Column 0 = x, column 1 = exp(2x + 1) for an unsorted x.
    //
    // Expect
    // ------
    // - Both output columns are identical.
    fn monotone_transform_preserves_ranks() {
        let x = Array1::from(vec![0.2, -1.0, 1.5, 4.0, -7.0, 9.0, 0.0]);
        let mut signal = Array2::<f64>::zeros((x.len(), 2));
        signal.column_mut(0).assign(&x);
        signal.column_mut(1).assign(&x.mapv(|v| (2.0 * v + 1.0).exp()));

        let ranks = rank_transform(signal.view(), RankEncoding::Average, Centering::Continuous);

        assert_eq!(ranks.column(0), ranks.column(1));
    }

    #[test]
    // Purpose
    // -------
    // Verify that infinities rank as extremes and that repeated infinities
    // tie like any other repeated value.
    //
    // Given
    // -----
    // - x = [+∞, 1, +∞, −∞, 2] and its finite stand-in [9, 1, 9, −9, 2].
    //
    // Expect
    // ------
    // - Identical ranks for every encoding; `Average` gives both +∞ the
    //   mid-rank 3.5 of positions 3 and 4.
    fn infinities_rank_like_extreme_values() {
        let inf = f64::INFINITY;
        let x = array![[inf], [1.0], [inf], [-inf], [2.0]];
        let stand_in = array![[9.0], [1.0], [9.0], [-9.0], [2.0]];

        for encoding in [RankEncoding::SortPosition, RankEncoding::Ordinal, RankEncoding::Average] {
            let a = rank_transform(x.view(), encoding, Centering::Continuous);
            let b = rank_transform(stand_in.view(), encoding, Centering::Continuous);
            assert_eq!(a, b, "{encoding:?}");
        }
        let average = rank_transform(x.view(), RankEncoding::Average, Centering::Continuous);
        assert_column(&average, 0, &[0.2, -0.3, 0.2, -0.5, -0.1]);
    }
}
