//! Activity description assembly from independent, optional report segments.
//!
//! Each segment (summits visited, weather, ...) is generated on its own. A
//! segment that fails is logged and left out, so the remaining segments still
//! make it into the description.

use std::fmt::Display;

use log::{info, warn};

/// Run one segment generator in isolation.
///
/// Errors are logged against `label` and turned into an absent segment.
///
/// # Example
/// ```
/// use summit_reporter::{combine_reports, report_segment, SummitError};
///
/// let summits = report_segment("summit", || {
///     Ok::<_, SummitError>(Some("Summits visited:\n...".to_string()))
/// });
/// let weather = report_segment("weather", || Err(SummitError::MissingStream("42".into())));
///
/// assert_eq!(weather, None);
/// assert_eq!(combine_reports([summits, weather]).as_deref(), Some("Summits visited:\n..."));
/// ```
pub fn report_segment<F, E>(label: &str, generate: F) -> Option<String>
where
    F: FnOnce() -> Result<Option<String>, E>,
    E: Display,
{
    match generate() {
        Ok(Some(segment)) => {
            info!("Generated {} report", label);
            Some(segment)
        }
        Ok(None) => {
            info!("No {} report to add", label);
            None
        }
        Err(e) => {
            warn!("Unable to generate {} report: {}", label, e);
            None
        }
    }
}

/// Join the present segments with a blank line between them.
///
/// Returns `None` if every segment is absent.
pub fn combine_reports<I>(reports: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    reports.into_iter().flatten().reduce(|mut acc, report| {
        acc.push_str("\n\n");
        acc.push_str(&report);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SummitError;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_combine_all_present() {
        assert_eq!(combine_reports([some("a"), some("b")]), some("a\n\nb"));
    }

    #[test]
    fn test_combine_skips_absent() {
        assert_eq!(combine_reports([None, some("b")]), some("b"));
        assert_eq!(combine_reports([some("a"), None]), some("a"));
        assert_eq!(combine_reports([some("a"), None, some("c")]), some("a\n\nc"));
    }

    #[test]
    fn test_combine_nothing() {
        assert_eq!(combine_reports([None, None]), None);
        assert_eq!(combine_reports(Vec::new()), None);
    }

    #[test]
    fn test_failed_segment_does_not_block_others() {
        let failed = report_segment("summit", || -> Result<Option<String>, SummitError> {
            Err(SummitError::MissingColumn("Metres".into()))
        });
        let weather = report_segment("weather", || Ok::<_, SummitError>(some("Weather: Sunny")));

        assert_eq!(combine_reports([failed, weather]), some("Weather: Sunny"));
    }

    #[test]
    fn test_empty_segment_passes_through() {
        assert_eq!(report_segment("summit", || Ok::<_, SummitError>(None)), None);
    }
}
