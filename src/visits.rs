//! Visit detection: which candidate summits a trail came close enough to.
//!
//! A summit is visited when any trail point passes within the proximity
//! threshold of it. A trail that loiters on a summit, or passes it twice,
//! still produces a single visit carrying the closest approach.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalogue::summit_coordinates;
use crate::error::Result;
use crate::nearest::{nearest_neighbour_search, NearestNeighbours};
use crate::search::{reduce_search_space, DEFAULT_SEARCH_MARGIN};
use crate::{CoordinateSet, SummitCatalogue, SummitRecord};

/// Configuration for visit detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitConfig {
    /// Maximum approach distance that counts as a visit, in metres.
    /// Default: 20.0
    pub proximity_threshold: f64,

    /// Margin around the trail extent used to prefilter the catalogue, in
    /// decimal degrees. `None` searches the whole catalogue.
    /// Default: 0.1 (~11 km north-south)
    pub search_margin: Option<f64>,
}

impl Default for VisitConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 20.0,
            search_margin: Some(DEFAULT_SEARCH_MARGIN),
        }
    }
}

impl VisitConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// A summit the trail visited, scoped to one report.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitedSummit<'a> {
    pub summit: &'a SummitRecord,
    /// Closest approach of the trail, in metres
    pub min_distance: f64,
    /// Labels the summit is reported under; empty until reduced
    pub labels: Vec<String>,
}

impl<'a> VisitedSummit<'a> {
    pub fn new(summit: &'a SummitRecord, min_distance: f64) -> Self {
        Self {
            summit,
            min_distance,
            labels: Vec::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }
}

/// Collapse nearest-neighbour results into one `(candidate index, closest distance)`
/// per visited candidate, ordered by candidate index.
///
/// Only trail points strictly closer than `proximity_threshold` count.
///
/// # Example
/// ```
/// use summit_reporter::{detect_visits, NearestNeighbours};
///
/// let nearest = NearestNeighbours {
///     distances: vec![15.0, 3.0, 500.0, 8.0],
///     indices: vec![2, 2, 0, 1],
/// };
/// assert_eq!(detect_visits(&nearest, 20.0), vec![(1, 8.0), (2, 3.0)]);
/// ```
pub fn detect_visits(nearest: &NearestNeighbours, proximity_threshold: f64) -> Vec<(usize, f64)> {
    let mut closest: BTreeMap<usize, f64> = BTreeMap::new();

    for (index, distance) in nearest.iter().filter(|&(_, d)| d < proximity_threshold) {
        closest
            .entry(index)
            .and_modify(|best| *best = best.min(distance))
            .or_insert(distance);
    }

    closest.into_iter().collect()
}

/// Find the catalogue summits a trail visited, in catalogue order.
///
/// The returned summits have no labels yet; see [`crate::generate_summit_report`].
/// An empty trail or catalogue yields no visits.
pub fn find_visited_summits<'a>(
    catalogue: &'a SummitCatalogue,
    trail: &CoordinateSet,
    config: &VisitConfig,
) -> Vec<VisitedSummit<'a>> {
    let candidates = reduce_search_space(catalogue.summits(), trail, config.search_margin);
    if candidates.is_empty() || trail.is_empty() {
        return Vec::new();
    }

    let candidate_coords = summit_coordinates(candidates.iter().copied());

    let nearest = nearest_neighbour_search(trail, &candidate_coords);
    let visits = detect_visits(&nearest, config.proximity_threshold);

    debug!(
        "{} trail points against {} candidates: {} visits within {}m",
        trail.len(),
        candidates.len(),
        visits.len(),
        config.proximity_threshold
    );

    visits
        .into_iter()
        .map(|(index, distance)| VisitedSummit::new(candidates[index], distance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> SummitCatalogue {
        SummitCatalogue::new(vec![
            SummitRecord::new(1, "A", 100.0, 0.0, 0.0, ["Tu"]),
            SummitRecord::new(2, "B", 200.0, 10.0, 0.0, ["Tu"]),
            SummitRecord::new(3, "C", 300.0, 20.0, 0.0, ["Tu"]),
        ])
        .unwrap()
    }

    fn names(visited: &[VisitedSummit]) -> Vec<String> {
        visited.iter().map(|v| v.summit.name.clone()).collect()
    }

    fn wide(threshold: f64) -> VisitConfig {
        VisitConfig { proximity_threshold: threshold, search_margin: None }
    }

    #[test]
    fn test_one_visited_summit() {
        let catalogue = catalogue();
        // each step of 1e-5 is approx. 1.11 m of distance
        let trail = CoordinateSet::new(vec![0.0, 1e-5, 2e-5], vec![0.0, 0.0, 0.0]).unwrap();

        let visited = find_visited_summits(&catalogue, &trail, &wide(10.0));
        assert_eq!(names(&visited), vec!["A"]);
        assert_eq!(visited[0].min_distance, 0.0);
        assert!(visited[0].labels.is_empty());
    }

    #[test]
    fn test_multiple_visited_summits() {
        let catalogue = catalogue();
        let trail = CoordinateSet::new(vec![0.0, 10.00001, 20.00001], vec![0.0, 0.0, 0.0]).unwrap();

        let visited = find_visited_summits(&catalogue, &trail, &wide(10.0));
        assert_eq!(names(&visited), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_visits_reported_in_catalogue_order() {
        let catalogue = catalogue();
        let trail = CoordinateSet::new(vec![20.0, 10.0, 0.0], vec![0.0, 0.0, 0.0]).unwrap();

        let visited = find_visited_summits(&catalogue, &trail, &wide(10.0));
        assert_eq!(names(&visited), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_no_visited_summits() {
        let catalogue = catalogue();
        let trail = CoordinateSet::new(vec![30.0, 30.0, 30.0], vec![0.0, 0.0, 0.0]).unwrap();
        assert!(find_visited_summits(&catalogue, &trail, &wide(10.0)).is_empty());
    }

    #[test]
    fn test_repeated_approaches_collapse_to_closest() {
        let catalogue = catalogue();
        // Approach A, leave, come back closer
        let trail = CoordinateSet::new(vec![5e-5, 1.0, 2e-5, 1e-4], vec![0.0; 4]).unwrap();

        let visited = find_visited_summits(&catalogue, &trail, &wide(20.0));
        assert_eq!(visited.len(), 1);
        assert!((visited[0].min_distance - 2.22).abs() < 0.01);
    }

    #[test]
    fn test_search_margin_excludes_distant_summits() {
        let catalogue = catalogue();
        let trail = CoordinateSet::new(vec![10.0], vec![0.0]).unwrap();

        let visited = find_visited_summits(&catalogue, &trail, &VisitConfig::default());
        assert_eq!(names(&visited), vec!["B"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let nearest = NearestNeighbours { distances: vec![20.0, 19.999], indices: vec![0, 1] };
        assert_eq!(detect_visits(&nearest, 20.0), vec![(1, 19.999)]);
    }

    #[test]
    fn test_empty_inputs() {
        let catalogue = catalogue();
        assert!(find_visited_summits(&catalogue, &CoordinateSet::empty(), &wide(10.0)).is_empty());

        let trail = CoordinateSet::new(vec![0.0], vec![0.0]).unwrap();
        assert!(find_visited_summits(&SummitCatalogue::default(), &trail, &wide(10.0)).is_empty());
        assert!(detect_visits(&NearestNeighbours::default(), 20.0).is_empty());
    }

    #[test]
    fn test_config_from_json_uses_defaults() {
        let config = VisitConfig::from_json_str(r#"{"proximity_threshold": 50.0}"#).unwrap();
        assert_eq!(config.proximity_threshold, 50.0);
        assert_eq!(config.search_margin, Some(DEFAULT_SEARCH_MARGIN));

        let config = VisitConfig::from_json_str(r#"{"search_margin": null}"#).unwrap();
        assert_eq!(config.search_margin, None);
    }
}
