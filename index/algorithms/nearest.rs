//! Nearest-K search over a coordinate-sorted slice of records
//!
//! The collection is sorted by `(latitude, longitude)`. A query does not rank
//! every record by distance; it seeds a window at the query's insertion point
//! and grows it one record at a time towards whichever neighbour is closer.
//!
//! ## Algorithm Overview
//!
//! 1. `k == 0` or empty slice: no results
//! 2. `k >= n`: every record with its distance, in collection order (unranked)
//! 3. Otherwise:
//!    - Binary search for the first record not ordered before the target
//!    - Emit it, then keep a `back` and a `forward` cursor around it
//!    - Each step emits the cursor whose record is strictly closer; equal
//!      distances go to `forward`. An exhausted side yields to the other one
//!
//! ## Accuracy
//!
//! The seed comes from the lexicographic coordinate order, not from true
//! distance, and only the two cursor heads are ever compared. Results are
//! greedy-local: a record that is close in longitude but sorted far away
//! (large longitude delta, small latitude delta around it) can be missed,
//! and the output is not globally sorted by distance.
//!
//! ## Performance
//!
//! - Time Complexity: O(log N + K)
//! - Space Complexity: O(K)

use super::distance::haversine_miles;
use crate::index::{Coordinate, Record};
use std::sync::Arc;

/// Result of a nearest search: a record and its distance to the query point
#[derive(Debug, Clone)]
pub struct DistanceResult {
    /// The record found
    pub record: Arc<Record>,
    /// Distance from the query point, in miles
    pub distance: f64,
}

impl DistanceResult {
    pub fn new(record: Arc<Record>, distance: f64) -> Self {
        Self { record, distance }
    }
}

fn measure(target: &Coordinate, record: &Arc<Record>) -> DistanceResult {
    DistanceResult::new(Arc::clone(record), haversine_miles(target, &record.coordinate))
}

/// Find up to `k` records near `target`
///
/// `records` must already be sorted by `Coordinate::sort_order`.
///
/// # Returns
///
/// `min(k, records.len())` results in emission order
pub fn nearest_search(records: &[Arc<Record>], target: &Coordinate, k: usize) -> Vec<DistanceResult> {
    let n = records.len();
    if k == 0 || n == 0 {
        return Vec::new();
    }

    if k >= n {
        return records.iter().map(|record| measure(target, record)).collect();
    }

    // A target ordered after every record has insertion point n; seed the
    // window at the last record instead.
    let index = records
        .partition_point(|record| record.coordinate.less_than(target))
        .min(n - 1);

    let mut results = Vec::with_capacity(k);
    results.push(measure(target, &records[index]));

    let mut forward = index + 1;
    let mut back = index.checked_sub(1);

    while results.len() < k {
        let back_hit = back.map(|i| measure(target, &records[i]));
        let forward_hit = (forward < n).then(|| measure(target, &records[forward]));

        match (back_hit, forward_hit) {
            (None, None) => break,
            (Some(b), Some(f)) if b.distance < f.distance => {
                results.push(b);
                back = back.and_then(|i| i.checked_sub(1));
            }
            (_, Some(f)) => {
                results.push(f);
                forward += 1;
            }
            (Some(b), None) => {
                results.push(b);
                back = back.and_then(|i| i.checked_sub(1));
            }
        }
    }

    results
}
