//! Weather summary segment for an activity description.
//!
//! Works on hourly samples that have already been fetched for the activity's
//! start location, with timestamps in the activity's local time. Fetching the
//! samples and resolving the local timezone belong to the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: i64 = 3600;

/// One hourly weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Local time of the observation, as seconds since the Unix epoch
    pub time: i64,
    pub condition: String,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub wind_mph: f64,
    pub gust_mph: f64,
}

/// Summarise the weather over an activity.
///
/// Samples from the start of the hour containing `start` through the end of
/// the hour containing `end` are used. Reports the most common condition, mean
/// temperature, lowest feels-like temperature, mean wind and strongest gust.
/// Returns `None` if no sample falls in that window.
pub fn summarise_weather(samples: &[WeatherSample], start: i64, end: i64) -> Option<String> {
    let window_start = start.div_euclid(SECONDS_PER_HOUR) * SECONDS_PER_HOUR;
    let window_end = -((-end).div_euclid(SECONDS_PER_HOUR)) * SECONDS_PER_HOUR;

    let in_window: Vec<&WeatherSample> = samples
        .iter()
        .filter(|s| s.time >= window_start && s.time <= window_end)
        .collect();

    if in_window.is_empty() {
        return None;
    }

    let n = in_window.len() as f64;
    let temperature = in_window.iter().map(|s| s.temp_c).sum::<f64>() / n;
    let feels_like = in_window.iter().map(|s| s.feelslike_c).fold(f64::INFINITY, f64::min);
    let wind = in_window.iter().map(|s| s.wind_mph).sum::<f64>() / n;
    let gust = in_window.iter().map(|s| s.gust_mph).fold(f64::NEG_INFINITY, f64::max);

    Some(format!(
        "Weather: {}\n\
         Temperature: {:.1} °C (feels like {:.1} °C)\n\
         Wind (mph): {:.1}, gusting {:.1}",
        most_common_condition(&in_window),
        temperature,
        feels_like,
        wind,
        gust
    ))
}

/// Most frequent condition text; ties go to the alphabetically first.
fn most_common_condition<'a>(samples: &[&'a WeatherSample]) -> &'a str {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for s in samples {
        *counts.entry(s.condition.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(condition, _)| condition)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(
        hour: i64,
        condition: &str,
        temp: f64,
        feels: f64,
        wind: f64,
        gust: f64,
    ) -> WeatherSample {
        WeatherSample {
            time: hour * SECONDS_PER_HOUR,
            condition: condition.to_string(),
            temp_c: temp,
            feelslike_c: feels,
            wind_mph: wind,
            gust_mph: gust,
        }
    }

    fn day() -> Vec<WeatherSample> {
        vec![
            sample(8, "Sunny", 20.0, 20.0, 1.0, 2.0),
            sample(9, "Patchy rain possible", 8.0, 4.0, 10.0, 20.0),
            sample(10, "Overcast", 7.5, 3.7, 12.0, 24.8),
            sample(11, "Patchy rain possible", 8.2, 5.0, 13.4, 22.0),
            sample(12, "Sunny", 25.0, 25.0, 1.0, 2.0),
        ]
    }

    #[test]
    fn test_summary_over_activity_window() {
        // 09:20 to 10:40 widens to 09:00..11:00
        let start = 9 * SECONDS_PER_HOUR + 20 * 60;
        let end = 10 * SECONDS_PER_HOUR + 40 * 60;

        let summary = summarise_weather(&day(), start, end).unwrap();
        assert_eq!(
            summary,
            "Weather: Patchy rain possible\n\
             Temperature: 7.9 °C (feels like 3.7 °C)\n\
             Wind (mph): 11.8, gusting 24.8"
        );
    }

    #[test]
    fn test_window_on_hour_boundaries() {
        let eight = 8 * SECONDS_PER_HOUR;
        let summary = summarise_weather(&day(), eight, eight).unwrap();
        assert!(summary.starts_with("Weather: Sunny\nTemperature: 20.0 °C"));
    }

    #[test]
    fn test_condition_tie_breaks_alphabetically() {
        let samples = vec![
            sample(1, "Overcast", 1.0, 1.0, 1.0, 1.0),
            sample(2, "Cloudy", 1.0, 1.0, 1.0, 1.0),
        ];
        let summary = summarise_weather(&samples, SECONDS_PER_HOUR, 2 * SECONDS_PER_HOUR).unwrap();
        assert!(summary.starts_with("Weather: Cloudy\n"));
    }

    #[test]
    fn test_no_samples_in_window() {
        assert_eq!(summarise_weather(&day(), 20 * SECONDS_PER_HOUR, 21 * SECONDS_PER_HOUR), None);
        assert_eq!(summarise_weather(&[], 0, 0), None);
    }
}
