//! # Hill Classifications
//!
//! Most summits belong to several overlapping lists at once: every Munro is
//! also a Munro Top, most Munros are Marilyns, and almost everything is a
//! Tump. Reporting every membership would be tautological, so each visited
//! summit's classifications are reduced to the labels worth reporting.
//!
//! A [`ReportConfiguration`] is an ordered list of [`ClassificationDefinition`]s.
//! Its order is both the report's heading order within each group and the
//! ranking of secondary classifications.
//!
//! ## Reduction rules
//!
//! - **Primary** (`is_primary && !is_top`): always reported, under every
//!   primary classification the summit holds.
//! - **Primary top** (`is_primary && is_top`): reported, under every primary
//!   top classification held, only if the summit holds no primary one.
//! - **Secondary** (`!is_primary`): if neither of the above applies, the
//!   summit is reported once, under its highest-ranked secondary
//!   classification. Earlier in the configuration ranks higher.
//!
//! Names outside the configuration are ignored. A summit left with no label
//! is dropped from the report.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One hill classification the report knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationDefinition {
    /// Code used as the catalogue's membership column header, e.g. `MT`
    pub code: String,
    /// Display name, e.g. `Munro Top`. Report headings append an `s`.
    pub name: String,
    pub is_primary: bool,
    pub is_top: bool,
}

impl ClassificationDefinition {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        is_primary: bool,
        is_top: bool,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            is_primary,
            is_top,
        }
    }

    pub fn is_primary_summit(&self) -> bool {
        self.is_primary && !self.is_top
    }

    pub fn is_primary_top(&self) -> bool {
        self.is_primary && self.is_top
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

/// Ordered classification vocabulary and reporting priority.
///
/// Serialises as a plain JSON array of definitions.
///
/// # Example
/// ```
/// use summit_reporter::{ClassificationDefinition, ReportConfiguration};
///
/// let config = ReportConfiguration::new(vec![
///     ClassificationDefinition::new("M", "Munro", true, false),
///     ClassificationDefinition::new("MT", "Munro Top", true, true),
///     ClassificationDefinition::new("Hu", "Hump", false, false),
///     ClassificationDefinition::new("Tu", "Tump", false, false),
/// ]);
///
/// assert_eq!(config.name_for_code("MT"), Some("Munro Top"));
/// assert_eq!(config.secondary_ranking(), vec!["Tump", "Hump"]);
/// assert_eq!(config.rank("Hump"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportConfiguration {
    classes: Vec<ClassificationDefinition>,
}

impl Default for ReportConfiguration {
    /// British and Irish hill lists, in reporting priority.
    fn default() -> Self {
        let def = ClassificationDefinition::new;
        Self::new(vec![
            // Primary classifications: always report, even if duplicated
            def("M", "Munro", true, false),
            def("C", "Corbett", true, false),
            def("G", "Graham", true, false),
            def("D", "Donald", true, false),
            def("F", "Furth", true, false),
            def("W", "Wainwright", true, false),
            // Tops: only report if not already primary
            def("MT", "Munro Top", true, true),
            def("CT", "Corbett Top", true, true),
            def("GT", "Graham Top", true, true),
            def("DT", "Donald Top", true, true),
            // Secondary classifications: report once, under the highest ranked
            def("Hew", "Hewitt", false, false),
            def("N", "Nuttall", false, false),
            def("Ma", "Marilyn", false, false),
            def("Hu", "Hump", false, false),
            def("Tu", "Tump", false, false),
            def("Sim", "Simm", false, false),
        ])
    }
}

impl ReportConfiguration {
    pub fn new(classes: Vec<ClassificationDefinition>) -> Self {
        Self { classes }
    }

    /// Parse a configuration from a JSON array of definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn classes(&self) -> &[ClassificationDefinition] {
        &self.classes
    }

    /// Every configured code, in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.code.as_str())
    }

    pub fn name_for_code(&self, code: &str) -> Option<&str> {
        self.classes
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.name.as_str())
    }

    /// Map classification codes to display names, silently dropping unknown codes.
    pub fn codes_to_names<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        codes
            .iter()
            .filter_map(|code| self.name_for_code(code.as_ref()))
            .map(str::to_string)
            .collect()
    }

    fn names_where(&self, keep: impl Fn(&ClassificationDefinition) -> bool) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|c| keep(*c))
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn primary_names(&self) -> Vec<&str> {
        self.names_where(ClassificationDefinition::is_primary_summit)
    }

    pub fn primary_top_names(&self) -> Vec<&str> {
        self.names_where(ClassificationDefinition::is_primary_top)
    }

    /// Secondary names in reverse configuration order.
    ///
    /// A name's rank is its index in this list, so the first secondary
    /// classification in the configuration has the highest rank.
    pub fn secondary_ranking(&self) -> Vec<&str> {
        let mut ranking = self.names_where(ClassificationDefinition::is_secondary);
        ranking.reverse();
        ranking
    }

    /// Rank of a secondary classification name; `None` if it is not one.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.secondary_ranking().iter().position(|&n| n == name)
    }

    /// Report heading order: primary names, then primary tops, then
    /// secondary names, each in configuration order, without repeats.
    pub fn heading_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::with_capacity(self.classes.len());
        let groups = [
            self.primary_names(),
            self.primary_top_names(),
            self.names_where(ClassificationDefinition::is_secondary),
        ];
        for name in groups.into_iter().flatten() {
            if !order.contains(&name) {
                order.push(name);
            }
        }
        order
    }

    /// Precompute the name groups used to reduce many summits.
    pub fn ranking(&self) -> ClassificationRanking<'_> {
        ClassificationRanking {
            primary: self.primary_names(),
            primary_top: self.primary_top_names(),
            secondary: self.secondary_ranking(),
        }
    }
}

/// Name groups derived from a [`ReportConfiguration`], ready for reduction.
#[derive(Debug, Clone)]
pub struct ClassificationRanking<'a> {
    primary: Vec<&'a str>,
    primary_top: Vec<&'a str>,
    secondary: Vec<&'a str>,
}

impl ClassificationRanking<'_> {
    /// Reduce one summit's classification names to its reportable labels.
    pub fn reduce<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();

        let is_primary_summit = names.iter().any(|n| self.primary.contains(n));
        let is_primary_top = names.iter().any(|n| self.primary_top.contains(n));

        if is_primary_summit {
            return names
                .into_iter()
                .filter(|n| self.primary.contains(n))
                .map(str::to_string)
                .collect();
        }

        if is_primary_top {
            return names
                .into_iter()
                .filter(|n| self.primary_top.contains(n))
                .map(str::to_string)
                .collect();
        }

        // Rank is the index into the reversed secondary list, so a higher
        // rank means earlier in the configuration. `>=` lets a later name of
        // equal rank replace the current best.
        let mut best: Option<&str> = None;
        let mut highest_rank = 0;
        for name in names {
            if let Some(rank) = self.secondary.iter().position(|&n| n == name) {
                if rank >= highest_rank {
                    highest_rank = rank;
                    best = Some(name);
                }
            }
        }

        best.map(|name| vec![name.to_string()]).unwrap_or_default()
    }
}

/// Reduce one summit's classification names to its reportable labels.
///
/// Convenience wrapper around [`ReportConfiguration::ranking`] for a single summit.
///
/// # Example
/// ```
/// use summit_reporter::{reduce_classifications, ReportConfiguration};
///
/// let config = ReportConfiguration::default();
/// assert_eq!(reduce_classifications(&["Munro", "Munro Top"], &config), vec!["Munro"]);
/// assert_eq!(reduce_classifications(&["Tump", "Marilyn", "Hump"], &config), vec!["Marilyn"]);
/// ```
pub fn reduce_classifications<S: AsRef<str>>(
    names: &[S],
    config: &ReportConfiguration,
) -> Vec<String> {
    config.ranking().reduce(names)
}
