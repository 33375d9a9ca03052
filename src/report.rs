//! Visited-summit report text.
//!
//! ```text
//! Summits visited:
//! Munros: Carn a' Mhaim (1037 m), Ben Macdui (1309 m)
//!
//! Munro Tops: Stob Coire an t-Sneachda (1176 m)
//! ```
//!
//! One paragraph per classification label, in the configuration's heading
//! order, listing summits in catalogue order. A summit reported under two
//! labels appears in both paragraphs.

use log::debug;

use crate::classification::ReportConfiguration;
use crate::visits::VisitedSummit;

const REPORT_TITLE: &str = "Summits visited:";

/// Reduce each visited summit's classifications and format the report.
///
/// Summit classification codes are mapped to names through `config`, then
/// reduced to reportable labels. Returns `None` when no summit ends up with
/// a label.
pub fn generate_summit_report(
    mut visited: Vec<VisitedSummit<'_>>,
    config: &ReportConfiguration,
) -> Option<String> {
    let ranking = config.ranking();

    for visit in &mut visited {
        let names = config.codes_to_names(visit.summit.classifications.as_slice());
        visit.labels = ranking.reduce(names.as_slice());
    }

    let before = visited.len();
    visited.retain(|v| !v.labels.is_empty());
    if visited.len() < before {
        debug!("{} visited summits have no reportable classification", before - visited.len());
    }

    format_summit_report(&visited, config)
}

/// Format already-reduced summits into the report text.
///
/// Headings follow [`ReportConfiguration::heading_order`] and are pluralised
/// by appending `s`. Labels that are not configured classification names are
/// not reported. Returns `None` if there is nothing to report.
///
/// # Example
/// ```
/// use summit_reporter::{format_summit_report, ReportConfiguration, SummitRecord, VisitedSummit};
///
/// let summit = SummitRecord::new(1, "Ben Nevis", 1345.0, 56.7969, -5.0036, ["M"]);
/// let visited = vec![VisitedSummit::new(&summit, 3.5).with_labels(["Munro"])];
///
/// let report = format_summit_report(&visited, &ReportConfiguration::default());
/// assert_eq!(report.as_deref(), Some("Summits visited:\nMunros: Ben Nevis (1345 m)"));
///
/// assert_eq!(format_summit_report(&[], &ReportConfiguration::default()), None);
/// ```
pub fn format_summit_report(
    visited: &[VisitedSummit<'_>],
    config: &ReportConfiguration,
) -> Option<String> {
    let paragraphs: Vec<String> = config
        .heading_order()
        .into_iter()
        .filter_map(|label| {
            let summits: Vec<String> = visited
                .iter()
                .filter(|v| v.labels.iter().any(|l| l == label))
                .map(|v| v.summit.describe())
                .collect();

            if summits.is_empty() {
                None
            } else {
                Some(format!("{}s: {}", label, summits.join(", ")))
            }
        })
        .collect();

    if paragraphs.is_empty() {
        return None;
    }

    Some(format!("{}\n{}", REPORT_TITLE, paragraphs.join("\n\n")))
}
