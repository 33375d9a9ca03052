//! Brute-force nearest-neighbour assignment of trail points to candidate summits.
//!
//! Every trail point is compared with every candidate through the full
//! haversine distance matrix. There is no spatial index: the candidate set is
//! already cut down by [`crate::search`] and a single trail is at most a few
//! tens of thousands of points.

use crate::geo_utils::haversine_matrix;
use crate::CoordinateSet;

/// Nearest candidate for every trail point, as two parallel arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearestNeighbours {
    /// Distance in metres from each trail point to its nearest candidate
    pub distances: Vec<f64>,
    /// Index into the candidate set of each trail point's nearest candidate
    pub indices: Vec<usize>,
}

impl NearestNeighbours {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `(candidate index, distance)` per trail point, in trail order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// For each point of `coordinates`, find the closest point of `reference_points`.
///
/// Both sets are in decimal degrees. Ties go to the lowest candidate index.
/// With no reference points there is nothing to be nearest to, and the result
/// is empty whatever the trail length.
///
/// # Example
/// ```
/// use summit_reporter::{nearest_neighbour_search, CoordinateSet};
///
/// let trail = CoordinateSet::new(vec![1.0, 50.0, 75.0], vec![0.0, 0.0, 0.0]).unwrap();
/// let summits = CoordinateSet::new(vec![75.0, 50.0, 1.0], vec![0.0, 0.0, 0.0]).unwrap();
///
/// let nearest = nearest_neighbour_search(&trail, &summits);
/// assert_eq!(nearest.indices, vec![2, 1, 0]);
/// assert!(nearest.distances.iter().all(|&d| d == 0.0));
/// ```
pub fn nearest_neighbour_search(
    coordinates: &CoordinateSet,
    reference_points: &CoordinateSet,
) -> NearestNeighbours {
    if reference_points.is_empty() {
        return NearestNeighbours::default();
    }

    let matrix = haversine_matrix(&coordinates.to_radians(), &reference_points.to_radians());

    let (distances, indices) = matrix.iter().map(|row| argmin(row)).unzip();
    NearestNeighbours { distances, indices }
}

/// Minimum of a non-empty row as `(value, index)`; the first occurrence wins.
fn argmin(row: &[f64]) -> (f64, usize) {
    let mut best = (f64::INFINITY, 0);
    for (index, &distance) in row.iter().enumerate() {
        if distance < best.0 {
            best = (distance, index);
        }
    }
    best
}
