//! Bar extraction module.
//!
//! Collapses a chromagram (pitch-class energy over time) into a small, fixed
//! number of values that can be used directly as bar heights in a bar-style
//! visualization.
//!
//! Exactly one time frame is sampled per bar, there is no averaging over a
//! window of frames. Long inputs will therefore alias when the number of
//! frames is much larger than the number of bars.

use std::num::NonZeroUsize;

use likely_stable::unlikely;
use log::{debug, trace};
use ndarray::{Array2, ArrayBase, Data, Ix2};

use crate::Feature;
use crate::errors::{BarsError, BarsResult};

/// The number of bars the viewer draws when nothing else is requested.
pub const DEFAULT_NUM_BARS: usize = 32;

/// A validated, strictly positive number of bars.
///
/// Counts coming from the outside world (config files, command line flags)
/// are signed, this is the one place where they get checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarCount(NonZeroUsize);

impl BarCount {
    pub const DEFAULT: Self = match NonZeroUsize::new(DEFAULT_NUM_BARS) {
        Some(count) => Self(count),
        None => panic!("the default bar count must be non-zero"),
    };

    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for BarCount {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<NonZeroUsize> for BarCount {
    #[inline]
    fn from(count: NonZeroUsize) -> Self {
        Self(count)
    }
}

impl TryFrom<usize> for BarCount {
    type Error = BarsError;

    #[inline]
    fn try_from(count: usize) -> BarsResult<Self> {
        NonZeroUsize::new(count).map(Self).ok_or_else(|| {
            BarsError::InvalidArgument(String::from("num_bars must be positive, got 0"))
        })
    }
}

impl TryFrom<i64> for BarCount {
    type Error = BarsError;

    #[inline]
    fn try_from(count: i64) -> BarsResult<Self> {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(Self)
            .ok_or_else(|| {
                BarsError::InvalidArgument(format!("num_bars must be positive, got {count}"))
            })
    }
}

impl std::fmt::Display for BarCount {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Index of the time frame sampled for bar `bar` out of `num_bars`, over
/// `columns` frames.
///
/// This is `floor(bar / num_bars * columns)`, computed with integer
/// arithmetic so that bar boundaries never shift by one frame due to
/// rounding. Widened to `u128` so the product can't overflow.
#[must_use]
#[inline]
pub fn sample_column(bar: usize, num_bars: usize, columns: usize) -> usize {
    debug_assert!(num_bars > 0, "num_bars must be positive");
    let index = (bar as u128 * columns as u128) / num_bars as u128;
    // index < columns whenever bar < num_bars
    usize::try_from(index).unwrap_or(usize::MAX)
}

/// Extract `num_bars` normalized bar values from a feature matrix.
///
/// `matrix` is indexed by (pitch class, time frame), so usually has 12 rows.
/// For every bar, one column is sampled (see [`sample_column`]) and the
/// values of that column are averaged over all rows. The resulting sequence
/// is then min-max normalized so that the shortest bar is `0.0` and the
/// tallest is `1.0`.
///
/// If every sampled value is the same there is no range to normalize over,
/// and the raw averages are returned as-is (so a matrix filled with `k`
/// yields `num_bars` copies of `k`).
///
/// # Errors
///
/// Returns [`BarsError::InvalidArgument`] if `num_bars` is zero or too large
/// to allocate, or if the matrix has no rows or no columns.
///
/// # Example
///
/// ```rust
/// use mviz_analysis::bars::extract_bars;
/// use ndarray::arr2;
///
/// let chroma = arr2(&[[1., 2., 3., 4.], [1., 2., 3., 4.]]);
/// let bars = extract_bars(&chroma, 4).unwrap();
/// assert_eq!(bars.len(), 4);
/// assert_eq!(bars[0], 0.0);
/// assert_eq!(bars[3], 1.0);
/// ```
#[allow(clippy::missing_inline_in_public_items)]
pub fn extract_bars<S>(matrix: &ArrayBase<S, Ix2>, num_bars: usize) -> BarsResult<Vec<Feature>>
where
    S: Data<Elem = Feature>,
{
    let num_bars = BarCount::try_from(num_bars)?;
    extract_bar_count(matrix, num_bars)
}

/// Same as [`extract_bars`], with an already validated bar count.
///
/// # Errors
///
/// Returns [`BarsError::InvalidArgument`] if the matrix has no rows or no
/// columns, or if `num_bars` values can't be allocated.
#[allow(clippy::missing_inline_in_public_items)]
pub fn extract_bar_count<S>(
    matrix: &ArrayBase<S, Ix2>,
    num_bars: BarCount,
) -> BarsResult<Vec<Feature>>
where
    S: Data<Elem = Feature>,
{
    let (rows, columns) = matrix.dim();
    if unlikely(rows == 0 || columns == 0) {
        return Err(BarsError::InvalidArgument(format!(
            "feature matrix must have at least one row and one column, got shape ({rows}, {columns})"
        )));
    }
    let num_bars = num_bars.get();
    trace!("Extracting {num_bars} bars from a ({rows}, {columns}) feature matrix");

    let mut raw_values = Vec::<Feature>::new();
    raw_values.try_reserve_exact(num_bars).map_err(|e| {
        BarsError::InvalidArgument(format!("can't allocate {num_bars} bars: {e}"))
    })?;

    #[allow(clippy::cast_precision_loss)]
    let row_count = rows as Feature;
    raw_values.extend((0..num_bars).map(|bar| {
        let idx = sample_column(bar, num_bars, columns);
        if idx < columns {
            // summed in row order
            matrix.column(idx).iter().sum::<Feature>() / row_count
        } else {
            0.
        }
    }));

    Ok(min_max_normalize(raw_values))
}

/// Rescale `values` to span exactly `[0, 1]`.
///
/// Leaves `values` untouched when they are all equal.
fn min_max_normalize(mut values: Vec<Feature>) -> Vec<Feature> {
    let (min_val, max_val) = values
        .iter()
        .fold((Feature::INFINITY, Feature::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });

    if max_val > min_val {
        let range = max_val - min_val;
        for value in &mut values {
            *value = (*value - min_val) / range;
        }
    } else {
        // NOTE: flat input keeps its raw values instead of being mapped to
        // 0 (or 0.5). Consumers that assume [0, 1] will overflow if k > 1.
        debug!("Flat bar sequence ({min_val}), skipping normalization");
    }

    values
}

/// Build a feature matrix out of rows of equal length.
///
/// # Errors
///
/// Returns [`BarsError::InvalidArgument`] if the rows don't all have the
/// same length.
#[allow(clippy::missing_inline_in_public_items)]
pub fn matrix_from_rows(rows: Vec<Vec<Feature>>) -> BarsResult<Array2<Feature>> {
    let n_rows = rows.len();
    let n_columns = rows.first().map_or(0, Vec::len);

    if let Some((idx, row)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != n_columns)
    {
        return Err(BarsError::InvalidArgument(format!(
            "ragged feature matrix: row {idx} has {} columns, expected {n_columns}",
            row.len()
        )));
    }

    let flat = rows.into_iter().flatten().collect::<Vec<Feature>>();
    Array2::from_shape_vec((n_rows, n_columns), flat)
        .map_err(|e| BarsError::InvalidArgument(format!("invalid feature matrix shape: {e}")))
}
