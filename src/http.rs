//! HTTP trail fetching from the Strava API.
//!
//! Fetches the `latlng` stream of an activity and turns it into a
//! [`CoordinateSet`]. Requests are made once; retrying and token refresh are
//! left to the caller.

use std::time::{Duration, Instant};

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SummitError};
use crate::{CoordinateSet, TrailSource};

const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Streams endpoint response with `key_by_type=true`
#[derive(Debug, Deserialize)]
struct StreamSetResponse {
    latlng: Option<LatLngStream>,
}

#[derive(Debug, Deserialize)]
struct LatLngStream {
    data: Vec<[f64; 2]>,
}

/// Fetches activity trails with an athlete's access token.
pub struct StravaTrailFetcher {
    client: Client,
    auth_header: String,
    base_url: String,
}

impl StravaTrailFetcher {
    /// Create a fetcher authorised with the given OAuth access token.
    pub fn new(access_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            auth_header: format!("Bearer {}", access_token),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the fetcher at another API root, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn streams_url(&self, activity_id: &str) -> String {
        format!(
            "{}/activities/{}/streams?keys=latlng&key_by_type=true",
            self.base_url.trim_end_matches('/'),
            activity_id
        )
    }

    /// Fetch the trail of one activity.
    pub async fn fetch_trail(&self, activity_id: &str) -> Result<CoordinateSet> {
        let start = Instant::now();

        let response = self
            .client
            .get(self.streams_url(activity_id))
            .header("Authorization", &self.auth_header)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        debug!(
            "[Fetch {}] {:.1}KB in {:?}",
            activity_id,
            bytes.len() as f64 / 1024.0,
            start.elapsed()
        );

        let trail = parse_stream_set(activity_id, &bytes)?;
        info!("[Fetch {}] {} trail points in {:?}", activity_id, trail.len(), start.elapsed());

        Ok(trail)
    }

    /// Blocking wrapper that drives [`Self::fetch_trail`] on a private tokio runtime.
    pub fn fetch_trail_sync(&self, activity_id: &str) -> Result<CoordinateSet> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        rt.block_on(self.fetch_trail(activity_id))
    }
}

impl TrailSource for StravaTrailFetcher {
    fn trail(&self, activity_id: &str) -> Result<CoordinateSet> {
        self.fetch_trail_sync(activity_id)
    }
}

fn parse_stream_set(activity_id: &str, body: &[u8]) -> Result<CoordinateSet> {
    let streams: StreamSetResponse = serde_json::from_slice(body)?;
    let latlng = streams
        .latlng
        .ok_or_else(|| SummitError::MissingStream(activity_id.to_string()))?;

    let (latitude, longitude) = latlng.data.into_iter().map(|[lat, lng]| (lat, lng)).unzip();
    CoordinateSet::new(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stream_set() {
        let body = br#"{
            "latlng": {
                "data": [[57.07, -3.67], [57.08, -3.66]],
                "series_type": "distance",
                "original_size": 2,
                "resolution": "high"
            },
            "distance": {"data": [0.0, 1200.0]}
        }"#;
        let trail = parse_stream_set("1", body).unwrap();
        assert_eq!(trail.latitude(), &[57.07, 57.08]);
        assert_eq!(trail.longitude(), &[-3.67, -3.66]);
    }

    #[test]
    fn test_parse_stream_set_without_latlng() {
        let body = br#"{"distance": {"data": [0.0]}}"#;
        assert!(matches!(
            parse_stream_set("42", body),
            Err(SummitError::MissingStream(ref id)) if id == "42"
        ));
    }

    #[test]
    fn test_streams_url() {
        let fetcher = StravaTrailFetcher::new("token")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            fetcher.streams_url("123"),
            "http://localhost:8080/activities/123/streams?keys=latlng&key_by_type=true"
        );
    }
}
