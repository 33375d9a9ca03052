//! # Summit Catalogue
//!
//! The reference list of named summits that trails are matched against.
//!
//! A catalogue is loaded once per report request and only ever read
//! afterwards, so it can be shared freely between concurrent reports.
//! Classification membership is held as a list of codes per summit rather
//! than as dynamic boolean columns.
//!
//! ## CSV layout
//!
//! The CSV loader expects a header row containing the columns named by a
//! [`CatalogueSchema`] (by default `Number`, `Name`, `Metres`, `Latitude`,
//! `Longitude`) plus one membership column per classification code, holding
//! `1`/`0`, `true`/`false`, or nothing:
//!
//! ```text
//! Number,Name,Metres,Latitude,Longitude,M,MT,Ma
//! 1,Ben Nevis,1345,56.7969,-5.0036,1,1,1
//! 2,Carn Mor Dearg,1220,56.8050,-4.9870,1,1,0
//! ```
//!
//! Code columns the configuration knows about but the file lacks are never
//! held by any summit. Columns the configuration does not know about are
//! ignored.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::classification::ReportConfiguration;
use crate::error::{Result, SummitError};
use crate::CoordinateSet;

/// A named summit from the reference catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummitRecord {
    /// Unique identifier within the catalogue
    pub id: u32,
    pub name: String,
    /// Elevation in metres
    pub metres: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Classification codes this summit belongs to, in catalogue column order
    pub classifications: Vec<String>,
    /// How `metres` is written in reports
    #[serde(default)]
    pub elevation_format: ElevationFormat,
}

/// Written form of an elevation, following the catalogue's `Metres` column.
///
/// A column holding only whole numbers reads `1309 m`. As soon as one cell
/// carries a decimal point or exponent the whole column is decimal, and whole
/// values keep a trailing `.0`: `1309.0 m`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevationFormat {
    #[default]
    Integral,
    Decimal,
}

impl ElevationFormat {
    /// Format of a column given its raw cell texts.
    pub fn detect<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        if cells.into_iter().any(|c| c.contains(['.', 'e', 'E'])) {
            Self::Decimal
        } else {
            Self::Integral
        }
    }

    pub fn format(self, metres: f64) -> String {
        match self {
            Self::Decimal if metres.is_finite() && metres.fract() == 0.0 => {
                format!("{:.1}", metres)
            }
            _ => metres.to_string(),
        }
    }
}

impl SummitRecord {
    pub fn new<I, S>(
        id: u32,
        name: impl Into<String>,
        metres: f64,
        latitude: f64,
        longitude: f64,
        classifications: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            metres,
            latitude,
            longitude,
            classifications: classifications.into_iter().map(Into::into).collect(),
            elevation_format: ElevationFormat::default(),
        }
    }

    pub fn with_elevation_format(mut self, format: ElevationFormat) -> Self {
        self.elevation_format = format;
        self
    }

    /// Short description used in reports, e.g. `Ben Nevis (1345 m)`.
    pub fn describe(&self) -> String {
        format!("{} ({} m)", self.name, self.elevation_format.format(self.metres))
    }
}

/// Column names the CSV loader reads summit attributes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueSchema {
    pub id_column: String,
    pub name_column: String,
    pub metres_column: String,
    pub latitude_column: String,
    pub longitude_column: String,
}

impl Default for CatalogueSchema {
    fn default() -> Self {
        Self {
            id_column: "Number".to_string(),
            name_column: "Name".to_string(),
            metres_column: "Metres".to_string(),
            latitude_column: "Latitude".to_string(),
            longitude_column: "Longitude".to_string(),
        }
    }
}

/// An ordered, immutable collection of summits with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummitCatalogue {
    summits: Vec<SummitRecord>,
}

impl SummitCatalogue {
    /// Build a catalogue, rejecting duplicate summit ids.
    pub fn new(summits: Vec<SummitRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(summits.len());
        for summit in &summits {
            if !seen.insert(summit.id) {
                return Err(SummitError::DuplicateId(summit.id));
            }
        }
        Ok(Self { summits })
    }

    /// Load a catalogue from CSV data.
    ///
    /// `codes` lists the classification codes whose membership columns should
    /// be read; any other non-schema columns are ignored.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        schema: &CatalogueSchema,
        codes: &[&str],
    ) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| SummitError::MissingColumn(name.to_string()))
        };

        let id_col = column(&schema.id_column)?;
        let name_col = column(&schema.name_column)?;
        let metres_col = column(&schema.metres_column)?;
        let lat_col = column(&schema.latitude_column)?;
        let lng_col = column(&schema.longitude_column)?;

        // Membership columns in header order
        let code_cols: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| codes.contains(h))
            .collect();

        debug!(
            "Catalogue header: {} columns, {} of {} classification codes present",
            headers.len(),
            code_cols.len(),
            codes.len()
        );

        let mut summits = Vec::new();
        let mut metres_cells = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let cell = Cell { record: &record, headers: &headers, row: row + 1 };

            let mut classifications = Vec::new();
            for &(col, code) in &code_cols {
                if cell.flag(col)? {
                    classifications.push(code.to_string());
                }
            }

            summits.push(SummitRecord {
                id: cell.parse(id_col)?,
                name: cell.text(name_col).to_string(),
                metres: cell.parse(metres_col)?,
                latitude: cell.parse(lat_col)?,
                longitude: cell.parse(lng_col)?,
                classifications,
                elevation_format: ElevationFormat::Integral,
            });
            metres_cells.push(cell.text(metres_col).to_string());
        }

        let elevation_format = ElevationFormat::detect(metres_cells.iter().map(String::as_str));
        for summit in &mut summits {
            summit.elevation_format = elevation_format;
        }

        info!(
            "Loaded summit catalogue with {} summits ({:?} elevations)",
            summits.len(),
            elevation_format
        );
        Self::new(summits)
    }

    /// Load a catalogue from a CSV file.
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        schema: &CatalogueSchema,
        codes: &[&str],
    ) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file, schema, codes)
    }

    pub fn len(&self) -> usize {
        self.summits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summits.is_empty()
    }

    pub fn summits(&self) -> &[SummitRecord] {
        &self.summits
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummitRecord> {
        self.summits.iter()
    }

    pub fn get(&self, id: u32) -> Option<&SummitRecord> {
        self.summits.iter().find(|s| s.id == id)
    }

    /// Copy of the catalogue restricted to inclusive latitude/longitude windows.
    ///
    /// A `None` window leaves that axis unfiltered.
    pub fn window(&self, latitude: Option<(f64, f64)>, longitude: Option<(f64, f64)>) -> Self {
        let inside = |value: f64, window: Option<(f64, f64)>| {
            window.map_or(true, |(lo, hi)| value >= lo && value <= hi)
        };

        Self {
            summits: self
                .summits
                .iter()
                .filter(|s| inside(s.latitude, latitude) && inside(s.longitude, longitude))
                .cloned()
                .collect(),
        }
    }
}

/// Locations of `summits`, in the order given.
pub fn summit_coordinates<'a, I>(summits: I) -> CoordinateSet
where
    I: IntoIterator<Item = &'a SummitRecord>,
{
    let (latitude, longitude) = summits.into_iter().map(|s| (s.latitude, s.longitude)).unzip();
    CoordinateSet { latitude, longitude }
}

/// Accessor for one CSV data row with error context.
struct Cell<'a> {
    record: &'a StringRecord,
    headers: &'a StringRecord,
    row: usize,
}

impl Cell<'_> {
    fn text(&self, col: usize) -> &str {
        self.record.get(col).unwrap_or("")
    }

    fn invalid(&self, col: usize) -> SummitError {
        SummitError::InvalidValue {
            row: self.row,
            column: self.headers.get(col).unwrap_or("").to_string(),
            value: self.text(col).to_string(),
        }
    }

    fn parse<T: std::str::FromStr>(&self, col: usize) -> Result<T> {
        self.text(col).parse().map_err(|_| self.invalid(col))
    }

    fn flag(&self, col: usize) -> Result<bool> {
        match self.text(col).to_ascii_lowercase().as_str() {
            "1" | "1.0" | "true" => Ok(true),
            "0" | "0.0" | "false" | "" => Ok(false),
            _ => Err(self.invalid(col)),
        }
    }
}

/// Supplies the summit catalogue for a report request.
pub trait SummitSource {
    fn load_catalogue(&self) -> Result<SummitCatalogue>;
}

impl SummitSource for SummitCatalogue {
    fn load_catalogue(&self) -> Result<SummitCatalogue> {
        Ok(self.clone())
    }
}

/// Catalogue stored as a CSV file on local disk.
#[derive(Debug, Clone)]
pub struct CsvSummitSource {
    path: PathBuf,
    schema: CatalogueSchema,
    codes: Vec<String>,
}

impl CsvSummitSource {
    /// Read the membership columns for every code in `config`.
    pub fn new(path: impl Into<PathBuf>, config: &ReportConfiguration) -> Self {
        Self {
            path: path.into(),
            schema: CatalogueSchema::default(),
            codes: config.codes().map(str::to_string).collect(),
        }
    }

    pub fn with_schema(mut self, schema: CatalogueSchema) -> Self {
        self.schema = schema;
        self
    }
}

impl SummitSource for CsvSummitSource {
    fn load_catalogue(&self) -> Result<SummitCatalogue> {
        let codes: Vec<&str> = self.codes.iter().map(String::as_str).collect();
        SummitCatalogue::from_csv_path(&self.path, &self.schema, &codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Number,Name,Metres,Latitude,Longitude,class_1,class_2,class_3,Notes
1,summit_a,100,1,6,0,0,1,x
2,summit_b,200,2,7,0,1,1,
3,summit_c,300.5,3,8,1,1,1,y
";

    fn codes() -> Vec<&'static str> {
        vec!["class_1", "class_2", "class_3"]
    }

    fn fixture() -> SummitCatalogue {
        let schema = CatalogueSchema::default();
        SummitCatalogue::from_csv_reader(CSV.as_bytes(), &schema, &codes()).unwrap()
    }

    #[test]
    fn test_load_classifications_from_membership_columns() {
        let catalogue = fixture();
        assert_eq!(catalogue.len(), 3);

        let held: Vec<Vec<String>> = catalogue.iter().map(|s| s.classifications.clone()).collect();
        assert_eq!(held[0], vec!["class_3"]);
        assert_eq!(held[1], vec!["class_2", "class_3"]);
        assert_eq!(held[2], vec!["class_1", "class_2", "class_3"]);
        assert_eq!(catalogue.summits()[2].metres, 300.5);
    }

    #[test]
    fn test_load_ignores_codes_absent_from_header() {
        let mut with_extra = codes();
        with_extra.push("unrepresented_class");
        let schema = CatalogueSchema::default();
        let catalogue =
            SummitCatalogue::from_csv_reader(CSV.as_bytes(), &schema, &with_extra).unwrap();
        assert_eq!(catalogue.summits()[0].classifications, vec!["class_3"]);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Number,Name,Latitude,Longitude\n1,a,1,2\n";
        let err = SummitCatalogue::from_csv_reader(csv.as_bytes(), &CatalogueSchema::default(), &[])
            .unwrap_err();
        assert!(matches!(err, SummitError::MissingColumn(ref c) if c == "Metres"));
    }

    #[test]
    fn test_invalid_cell_value() {
        let csv = "Number,Name,Metres,Latitude,Longitude\n1,a,high,1,2\n";
        let err = SummitCatalogue::from_csv_reader(csv.as_bytes(), &CatalogueSchema::default(), &[])
            .unwrap_err();
        match err {
            SummitError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Metres");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let summits = vec![
            SummitRecord::new(7, "a", 1.0, 0.0, 0.0, Vec::<String>::new()),
            SummitRecord::new(7, "b", 2.0, 0.0, 0.0, Vec::<String>::new()),
        ];
        assert!(matches!(SummitCatalogue::new(summits), Err(SummitError::DuplicateId(7))));
    }

    #[test]
    fn test_window_without_filter_returns_everything() {
        let catalogue = fixture();
        assert_eq!(catalogue.window(None, None), catalogue);
    }

    #[test]
    fn test_window_filters_inclusively() {
        let catalogue = fixture();
        let filtered = catalogue.window(Some((2.0, 3.0)), None);
        let names: Vec<&str> = filtered.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["summit_b", "summit_c"]);

        let filtered = catalogue.window(Some((1.0, 3.0)), Some((6.5, 7.5)));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.summits()[0].name, "summit_b");
    }

    #[test]
    fn test_custom_schema() {
        let csv = "id,hill,height,lat,lon\n4,a,10,1,2\n";
        let schema = CatalogueSchema {
            id_column: "id".into(),
            name_column: "hill".into(),
            metres_column: "height".into(),
            latitude_column: "lat".into(),
            longitude_column: "lon".into(),
        };
        let catalogue = SummitCatalogue::from_csv_reader(csv.as_bytes(), &schema, &[]).unwrap();
        assert_eq!(catalogue.get(4).map(|s| s.name.as_str()), Some("a"));
    }

    fn load(csv: &str) -> SummitCatalogue {
        SummitCatalogue::from_csv_reader(csv.as_bytes(), &CatalogueSchema::default(), &[]).unwrap()
    }

    fn descriptions(catalogue: &SummitCatalogue) -> Vec<String> {
        catalogue.iter().map(SummitRecord::describe).collect()
    }

    #[test]
    fn test_decimal_metres_column_keeps_trailing_zero() {
        let catalogue = load(
            "Number,Name,Metres,Latitude,Longitude\n\
             1,Ben Macdui,1309.0,57.0704,-3.6691\n\
             2,Cairn Gorm,1244.8,57.1170,-3.6439\n\
             3,Stob Coire an t-Sneachda,1176,57.1120,-3.6500\n",
        );
        assert_eq!(catalogue.summits()[2].elevation_format, ElevationFormat::Decimal);
        assert_eq!(
            descriptions(&catalogue),
            vec![
                "Ben Macdui (1309.0 m)",
                "Cairn Gorm (1244.8 m)",
                "Stob Coire an t-Sneachda (1176.0 m)",
            ]
        );
    }

    #[test]
    fn test_integral_metres_column() {
        let catalogue = load(
            "Number,Name,Metres,Latitude,Longitude\n\
             1,Ben Macdui,1309,57.0704,-3.6691\n\
             2,Stob Coire an t-Sneachda,1176,57.1120,-3.6500\n",
        );
        assert_eq!(
            descriptions(&catalogue),
            vec!["Ben Macdui (1309 m)", "Stob Coire an t-Sneachda (1176 m)"]
        );
    }

    #[test]
    fn test_elevation_format_detection() {
        assert_eq!(ElevationFormat::detect(["1", "20", "300"]), ElevationFormat::Integral);
        assert_eq!(ElevationFormat::detect(["1", "2.5"]), ElevationFormat::Decimal);
        assert_eq!(ElevationFormat::detect(["1e3"]), ElevationFormat::Decimal);
        assert_eq!(ElevationFormat::detect(Vec::<&str>::new()), ElevationFormat::Integral);

        assert_eq!(ElevationFormat::Decimal.format(1037.0), "1037.0");
        assert_eq!(ElevationFormat::Decimal.format(1244.8), "1244.8");
        assert_eq!(ElevationFormat::Integral.format(1037.0), "1037");
    }

    #[test]
    fn test_summit_coordinates_in_given_order() {
        let catalogue = fixture();
        let coords = summit_coordinates(catalogue.iter().collect::<Vec<_>>().into_iter().rev());
        assert_eq!(coords.latitude(), &[3.0, 2.0, 1.0]);
        assert_eq!(coords.longitude(), &[8.0, 7.0, 6.0]);
        assert!(summit_coordinates(Vec::<&SummitRecord>::new()).is_empty());
    }

    #[test]
    fn test_describe() {
        let summit = SummitRecord::new(1, "Cairn Gorm", 1244.8, 57.117, -3.644, ["M"]);
        assert_eq!(summit.describe(), "Cairn Gorm (1244.8 m)");
        let summit = SummitRecord::new(2, "A", 1.0, 0.0, 0.0, ["D"]);
        assert_eq!(summit.describe(), "A (1 m)");
        let summit = summit.with_elevation_format(ElevationFormat::Decimal);
        assert_eq!(summit.describe(), "A (1.0 m)");
    }
}
