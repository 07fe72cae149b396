use arrow::array::{Array, BooleanArray};
use arrow::compute::{filter, filter_record_batch, sort_to_indices, take_record_batch};

use super::model::{Percentile, TripTable};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Quantile estimator
// ---------------------------------------------------------------------------

/// Quantile of an ascending-sorted sample by linear interpolation between
/// order statistics: position `h = (n - 1) * p`, blending `sorted[floor(h)]`
/// and `sorted[ceil(h)]` by the fractional part of `h`.
///
/// Returns `None` for an empty sample.
pub fn linear_quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi || a == b {
        return Some(a);
    }
    let weight = h - lo as f64;
    let q = a + (b - a) * weight;
    if q >= a && q <= b {
        return Some(q);
    }

    // `b - a` overflowed or the bracket holds an infinity.
    let blended = a * (1.0 - weight) + b * weight;
    Some(if blended.is_nan() { a } else { blended.clamp(a, b) })
}

// ---------------------------------------------------------------------------
// Percentile filter
// ---------------------------------------------------------------------------

/// Compute the `percentile` threshold of `column` and return the trips whose
/// value is strictly greater than it, sorted ascending by that column.
///
/// * Missing or non-numeric `column` → [`Error::Schema`](crate::Error::Schema),
///   even when the table is empty.
/// * Zero rows → an empty table with the same schema and no threshold.
/// * Null and NaN distances are left out of the quantile sample and never
///   selected. If nothing is left, the result is empty with no threshold.
///
/// The input table is not modified.
pub fn filter_by_percentile(
    table: &TripTable,
    percentile: Percentile,
    column: &str,
) -> Result<(TripTable, Option<f64>)> {
    let distances = table.distances(column)?;

    if table.is_empty() {
        return Ok((table.empty_like(), None));
    }

    let mut sample: Vec<f64> = distances.iter().flatten().filter(|v| !v.is_nan()).collect();
    let skipped = distances.len() - sample.len();
    if skipped > 0 {
        log::warn!("Ignoring {skipped} null/NaN values in '{column}'");
    }
    sample.sort_unstable_by(f64::total_cmp);

    let Some(threshold) = linear_quantile(&sample, percentile.value()) else {
        return Ok((table.empty_like(), None));
    };
    log::debug!(
        "{percentile} quantile of '{column}' over {} values: {threshold}",
        sample.len()
    );

    // Strict comparison: rows equal to the threshold stay out.
    let mask: BooleanArray = distances
        .iter()
        .map(|d| Some(matches!(d, Some(v) if v > threshold)))
        .collect();

    let selected = filter_record_batch(table.batch(), &mask)?;
    let selected_distances = filter(&distances, &mask)?;
    let order = sort_to_indices(&selected_distances, None, None)?;
    let sorted = take_record_batch(&selected, &order)?;

    Ok((TripTable::new(sorted), Some(threshold)))
}
