//! # Geographic Utilities
//!
//! Great-circle distance and extent computations used by summit matching.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance_radians`] | Great-circle distance between two points given in radians |
//! | [`haversine_distance`] | Great-circle distance between two GPS points in degrees |
//! | [`haversine_elementwise`] | Pairwise distances, broadcasting a single point |
//! | [`haversine_matrix`] | Full N×M distance matrix between two coordinate sets |
//! | [`compute_bounds`] | Bounding box of a coordinate set |
//!
//! ## Example
//!
//! ```rust
//! use summit_reporter::{GpsPoint, geo_utils};
//!
//! let ben_nevis = GpsPoint::new(56.7969, -5.0036);
//! let carn_mor_dearg = GpsPoint::new(56.8050, -4.9870);
//!
//! let dist = geo_utils::haversine_distance(&ben_nevis, &carn_mor_dearg);
//! assert!(dist > 1000.0 && dist < 2000.0);
//! ```
//!
//! ## Algorithm Notes
//!
//! The haversine formula assumes a spherical Earth of radius [`EARTH_RADIUS_KM`].
//! `geo::Haversine` uses the IUGG mean radius (6371.0088 km) instead, so the
//! formula is evaluated directly here to keep distances on the 6371 km sphere.
//!
//! Reference: [Haversine formula (Wikipedia)](https://en.wikipedia.org/wiki/Haversine_formula)

use geo::{BoundingRect, MultiPoint, Point};

use crate::error::{Result, SummitError};
use crate::{Bounds, CoordinateSet, GpsPoint};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Radius of the spherical Earth model, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance in metres between two points whose coordinates are in radians.
///
/// `d = 2·R·asin(√(sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlng/2)))`
///
/// Symmetric, zero for identical points and `π·R` for antipodal points.
#[inline]
pub fn haversine_distance_radians(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlng = lng2 - lng1;
    let a = (0.5 * dlat).sin().powi(2) + lat1.cos() * lat2.cos() * (0.5 * dlng).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();
    c * EARTH_RADIUS_KM * 1000.0
}

/// Great-circle distance in metres between two GPS points given in decimal degrees.
///
/// # Example
///
/// ```rust
/// use summit_reporter::{GpsPoint, geo_utils};
///
/// let p = GpsPoint::new(57.0702, -3.6689);
/// assert_eq!(geo_utils::haversine_distance(&p, &p), 0.0);
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    haversine_distance_radians(
        p1.latitude.to_radians(),
        p1.longitude.to_radians(),
        p2.latitude.to_radians(),
        p2.longitude.to_radians(),
    )
}

/// Evaluate the haversine distance elementwise over two coordinate sets in radians.
///
/// The sets must either have equal length, or one of them must hold a single
/// point which is then paired with every point of the other set.
///
/// # Errors
///
/// [`SummitError::ShapeMismatch`] when the lengths differ and neither is 1.
///
/// # Example
///
/// ```rust
/// use summit_reporter::{CoordinateSet, geo_utils};
///
/// let origin = CoordinateSet::new(vec![0.0], vec![0.0]).unwrap();
/// let others = CoordinateSet::new(vec![0.0, 0.5], vec![0.0, 0.0]).unwrap();
///
/// let d = geo_utils::haversine_elementwise(&origin, &others).unwrap();
/// assert_eq!(d.len(), 2);
/// assert_eq!(d[0], 0.0);
/// ```
pub fn haversine_elementwise(a: &CoordinateSet, b: &CoordinateSet) -> Result<Vec<f64>> {
    let (left, right) = (a.len(), b.len());
    let len = match (left, right) {
        (l, r) if l == r => l,
        (1, r) => r,
        (l, 1) => l,
        _ => return Err(SummitError::ShapeMismatch { left, right }),
    };

    let pick = |set: &CoordinateSet, i: usize| {
        let i = if set.len() == 1 { 0 } else { i };
        (set.latitude()[i], set.longitude()[i])
    };

    Ok((0..len)
        .map(|i| {
            let (lat1, lng1) = pick(a, i);
            let (lat2, lng2) = pick(b, i);
            haversine_distance_radians(lat1, lng1, lat2, lng2)
        })
        .collect())
}

/// Compute the full distance matrix between two coordinate sets in radians.
///
/// Row `i` holds the distances from `rows[i]` to every point of `cols`, so the
/// result is `rows.len()` vectors of `cols.len()` entries each. With the
/// `parallel` feature rows are computed on the rayon pool; the row order and
/// values are identical either way (`cargo test --features parallel`).
pub fn haversine_matrix(rows: &CoordinateSet, cols: &CoordinateSet) -> Vec<Vec<f64>> {
    let row_for = |i: usize| -> Vec<f64> {
        let (lat1, lng1) = (rows.latitude()[i], rows.longitude()[i]);
        cols.latitude()
            .iter()
            .zip(cols.longitude())
            .map(|(&lat2, &lng2)| haversine_distance_radians(lat1, lng1, lat2, lng2))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let matrix: Vec<Vec<f64>> = (0..rows.len()).into_par_iter().map(row_for).collect();

    #[cfg(not(feature = "parallel"))]
    let matrix: Vec<Vec<f64>> = (0..rows.len()).map(row_for).collect();

    matrix
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a coordinate set in decimal degrees.
///
/// Returns `None` for an empty set.
///
/// # Example
///
/// ```rust
/// use summit_reporter::{CoordinateSet, geo_utils};
///
/// let trail = CoordinateSet::new(vec![56.50, 56.52], vec![-4.10, -4.05]).unwrap();
/// let bounds = geo_utils::compute_bounds(&trail).unwrap();
/// assert_eq!(bounds.min_lat, 56.50);
/// assert_eq!(bounds.max_lng, -4.05);
/// ```
pub fn compute_bounds(coordinates: &CoordinateSet) -> Option<Bounds> {
    let points: MultiPoint<f64> = coordinates
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect();

    points.bounding_rect().map(|rect| Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
