//! Bounding-box prefilter of the summit catalogue.
//!
//! Nearest-summit matching costs O(N·M) distance evaluations, so summits far
//! outside the trail's extent are dropped first. The filter only removes
//! summits outside the trail's bounding box grown by `margin` degrees; it is
//! up to the caller to pick a margin large enough that no removed summit
//! could have been the nearest one to any trail point.

use log::debug;

use crate::geo_utils::compute_bounds;
use crate::{CoordinateSet, SummitRecord};

/// Margin applied around the trail extent when none is configured, in degrees.
pub const DEFAULT_SEARCH_MARGIN: f64 = 0.1;

/// Keep only the summits inside the trail's extent grown by `margin` degrees.
///
/// `None` disables the prefilter and returns every summit. An empty trail has
/// no extent, so nothing survives the filter. A negative margin shrinks the
/// extent, and once the box inverts nothing survives either. Catalogue order
/// is preserved.
///
/// # Example
/// ```
/// use summit_reporter::{reduce_search_space, CoordinateSet, SummitRecord};
///
/// let summits = vec![
///     SummitRecord::new(1, "near", 100.0, 56.05, -4.0, ["Tu"]),
///     SummitRecord::new(2, "far", 100.0, 57.0, -4.0, ["Tu"]),
/// ];
/// let trail = CoordinateSet::new(vec![56.0, 56.01], vec![-4.0, -4.0]).unwrap();
///
/// let candidates = reduce_search_space(&summits, &trail, Some(0.1));
/// assert_eq!(candidates.len(), 1);
/// assert_eq!(candidates[0].name, "near");
///
/// assert_eq!(reduce_search_space(&summits, &trail, None).len(), 2);
/// ```
pub fn reduce_search_space<'a>(
    summits: &'a [SummitRecord],
    trail: &CoordinateSet,
    margin: Option<f64>,
) -> Vec<&'a SummitRecord> {
    let Some(margin) = margin else {
        return summits.iter().collect();
    };

    let Some(window) = compute_bounds(trail).map(|b| b.expand(margin)) else {
        return Vec::new();
    };

    let candidates: Vec<&SummitRecord> = summits
        .iter()
        .filter(|s| window.contains(s.latitude, s.longitude))
        .collect();

    debug!(
        "Search window lat [{:.4}, {:.4}] lng [{:.4}, {:.4}]: {} of {} summits",
        window.min_lat,
        window.max_lat,
        window.min_lng,
        window.max_lng,
        candidates.len(),
        summits.len()
    );

    candidates
}
