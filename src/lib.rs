//! # Summit Reporter
//!
//! Detects which named summits a GPS trail visited and writes a short,
//! deduplicated report of them, grouped by hill classification.
//!
//! This library provides:
//! - Nearest-summit matching of every trail point against a summit catalogue
//! - Visit detection by proximity threshold, one entry per summit
//! - Reduction of overlapping hill classifications (Munro, Munro Top, Marilyn...)
//!   to the labels worth reporting
//! - Deterministic report text, plus helpers to combine it with other
//!   optional activity description segments
//!
//! ## Features
//!
//! - **`parallel`** - Compute distance-matrix rows in parallel with rayon
//! - **`http`** - Enable the Strava trail fetcher
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use summit_reporter::{
//!     CoordinateSet, ReportConfiguration, SummitCatalogue, SummitRecord, VisitConfig,
//!     report_visited_summits,
//! };
//!
//! let catalogue = SummitCatalogue::new(vec![
//!     SummitRecord::new(1, "Cairn Gorm", 1244.8, 57.1170, -3.6439, ["M"]),
//!     SummitRecord::new(2, "Stob Coire an t-Sneachda", 1176.0, 57.1120, -3.6500, ["MT"]),
//! ])
//! .unwrap();
//!
//! let trail = CoordinateSet::new(
//!     vec![57.1100, 57.11700001, 57.1300],
//!     vec![-3.6600, -3.6439, -3.6300],
//! )
//! .unwrap();
//!
//! let report = report_visited_summits(
//!     &trail,
//!     &catalogue,
//!     &ReportConfiguration::default(),
//!     &VisitConfig::default(),
//! );
//! assert_eq!(report.as_deref(), Some("Summits visited:\nMunros: Cairn Gorm (1244.8 m)"));
//! ```

use log::{debug, info};
use rstar::{Envelope, AABB};
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Result, SummitError};

pub mod geo_utils;

pub mod catalogue;
pub use catalogue::{
    CatalogueSchema, CsvSummitSource, ElevationFormat, SummitCatalogue, SummitRecord, SummitSource,
};

pub mod classification;
pub use classification::{reduce_classifications, ClassificationDefinition, ReportConfiguration};

pub mod search;
pub use search::{reduce_search_space, DEFAULT_SEARCH_MARGIN};

pub mod nearest;
pub use nearest::{nearest_neighbour_search, NearestNeighbours};

pub mod visits;
pub use visits::{detect_visits, find_visited_summits, VisitConfig, VisitedSummit};

pub mod report;
pub use report::{format_summit_report, generate_summit_report};

pub mod description;
pub use description::{combine_reports, report_segment};

pub mod weather;
pub use weather::{summarise_weather, WeatherSample};

// HTTP module for trail fetching
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::StravaTrailFetcher;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use summit_reporter::GpsPoint;
/// let point = GpsPoint::new(56.7969, -5.0036); // Ben Nevis
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Axis-aligned bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Grow the box by `margin` degrees on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_lat: self.min_lat - margin,
            max_lat: self.max_lat + margin,
            min_lng: self.min_lng - margin,
            max_lng: self.max_lng + margin,
        }
    }

    /// Whether the box encloses any area. Shrinking by more than half its
    /// extent leaves it inverted and empty.
    pub fn is_empty(&self) -> bool {
        !(self.min_lat <= self.max_lat && self.min_lng <= self.max_lng)
    }

    /// Whether the point lies inside the box. Edges count as inside; an
    /// inverted box contains nothing.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        !self.is_empty() && self.envelope().contains_point(&[longitude, latitude])
    }

    fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_lng, self.min_lat], [self.max_lng, self.max_lat])
    }
}

/// Paired latitude/longitude arrays of equal length.
///
/// Values are decimal degrees unless the set was produced by
/// [`CoordinateSet::to_radians`]. A set can never be observed with ragged
/// arrays: construction rejects mismatched lengths.
///
/// # Example
/// ```
/// use summit_reporter::CoordinateSet;
///
/// let trail = CoordinateSet::new(vec![56.79, 56.80], vec![-5.00, -4.99]).unwrap();
/// assert_eq!(trail.len(), 2);
/// assert_eq!(trail.get(1).unwrap().latitude, 56.80);
/// assert!(trail.get(2).is_err());
///
/// assert!(CoordinateSet::new(vec![56.79], vec![]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinateSet")]
pub struct CoordinateSet {
    latitude: Vec<f64>,
    longitude: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCoordinateSet {
    latitude: Vec<f64>,
    longitude: Vec<f64>,
}

impl TryFrom<RawCoordinateSet> for CoordinateSet {
    type Error = SummitError;

    fn try_from(raw: RawCoordinateSet) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl CoordinateSet {
    /// Build a coordinate set, failing if the arrays differ in length.
    pub fn new(latitude: Vec<f64>, longitude: Vec<f64>) -> Result<Self> {
        if latitude.len() != longitude.len() {
            return Err(SummitError::LengthMismatch {
                latitude: latitude.len(),
                longitude: longitude.len(),
            });
        }
        Ok(Self { latitude, longitude })
    }

    /// A set with no points.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[GpsPoint]) -> Self {
        let (latitude, longitude) = points.iter().map(|p| (p.latitude, p.longitude)).unzip();
        Self { latitude, longitude }
    }

    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    /// The point at `index`, or [`SummitError::IndexOutOfRange`].
    pub fn get(&self, index: usize) -> Result<GpsPoint> {
        match (self.latitude.get(index), self.longitude.get(index)) {
            (Some(&lat), Some(&lng)) => Ok(GpsPoint::new(lat, lng)),
            _ => Err(SummitError::IndexOutOfRange { index, len: self.len() }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GpsPoint> + '_ {
        self.latitude
            .iter()
            .zip(&self.longitude)
            .map(|(&lat, &lng)| GpsPoint::new(lat, lng))
    }

    /// Copy of this set with every coordinate converted from degrees to radians.
    pub fn to_radians(&self) -> Self {
        Self {
            latitude: self.latitude.iter().map(|v| v.to_radians()).collect(),
            longitude: self.longitude.iter().map(|v| v.to_radians()).collect(),
        }
    }
}

/// Anything that can supply the trail of an activity.
pub trait TrailSource {
    fn trail(&self, activity_id: &str) -> Result<CoordinateSet>;
}

// ============================================================================
// Core Functions
// ============================================================================

/// Generate the visited-summit report for one trail.
///
/// Runs the whole chain: search-space reduction, nearest-summit matching,
/// visit detection, classification reduction and formatting. Returns `None`
/// when no visited summit carries a reportable classification, including
/// for an empty trail or catalogue.
pub fn report_visited_summits(
    trail: &CoordinateSet,
    catalogue: &SummitCatalogue,
    config: &ReportConfiguration,
    visit_config: &VisitConfig,
) -> Option<String> {
    let start = std::time::Instant::now();

    let visited = find_visited_summits(catalogue, trail, visit_config);
    debug!("{} of {} summits visited", visited.len(), catalogue.len());

    let report = generate_summit_report(visited, config);

    info!(
        "Summit report for {} trail points {} in {:?}",
        trail.len(),
        if report.is_some() { "generated" } else { "empty" },
        start.elapsed()
    );

    report
}

// ============================================================================
// Tests
// ============================================================================
