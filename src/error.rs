//! Error type shared by every fallible operation in the crate.
//!
//! Classification and ranking never fail: unknown codes, summits matching no
//! configured classification and empty rankings suppress output instead of
//! producing an error. Only malformed input data reaches this type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummitError {
    /// Latitude and longitude arrays of a coordinate set differ in length.
    #[error("coordinate arrays differ in length: {latitude} latitudes, {longitude} longitudes")]
    LengthMismatch { latitude: usize, longitude: usize },

    #[error("coordinate index {index} out of range for a set of {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    /// Two coordinate sets cannot be broadcast against each other.
    #[error("cannot broadcast coordinate sets of {left} and {right} points")]
    ShapeMismatch { left: usize, right: usize },

    /// The catalogue lacks a column every summit record requires.
    #[error("catalogue is missing required column '{0}'")]
    MissingColumn(String),

    #[error("catalogue row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("catalogue contains duplicate summit id {0}")]
    DuplicateId(u32),

    /// An activity has no latitude/longitude stream to build a trail from.
    #[error("activity {0} has no latlng stream")]
    MissingStream(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SummitError>;
