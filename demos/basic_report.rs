//! Report the summits visited by a short Cairngorms walk.
//!
//! Run with: RUST_LOG=debug cargo run --example basic_report

use std::io::Cursor;

use summit_reporter::{
    combine_reports, find_visited_summits, generate_summit_report, report_segment,
    summarise_weather, CatalogueSchema, CoordinateSet, ReportConfiguration, SummitCatalogue,
    SummitError, VisitConfig, WeatherSample,
};

const CATALOGUE: &str = "\
Number,Name,Metres,Latitude,Longitude,M,MT,Ma,Hu,Tu
1,Cairn Gorm,1244.8,57.1170,-3.6439,1,0,1,1,1
2,Stob Coire an t-Sneachda,1176,57.1120,-3.6500,0,1,0,0,1
3,Cairn Lochan,1215,57.1110,-3.6700,0,1,0,0,1
4,Ben Macdui,1309,57.0704,-3.6691,1,0,1,1,1
";

fn main() {
    env_logger::init();

    let config = ReportConfiguration::default();
    let codes: Vec<&str> = config.codes().collect();

    let schema = CatalogueSchema::default();
    let reader = Cursor::new(CATALOGUE);
    let catalogue = match SummitCatalogue::from_csv_reader(reader, &schema, &codes) {
        Ok(catalogue) => catalogue,
        Err(e) => {
            eprintln!("Failed to load catalogue: {}", e);
            return;
        }
    };

    // Coire Cas car park, up the Fiacaill ridge, along the plateau rim
    let trail = CoordinateSet::new(
        vec![57.1340, 57.1250, 57.1170, 57.1145, 57.1120, 57.1115, 57.1110],
        vec![-3.6700, -3.6500, -3.6439, -3.6470, -3.6500, -3.6600, -3.6700],
    )
    .unwrap();

    let visit_config = VisitConfig::default();
    println!("Summit Report Example\n");
    println!(
        "Config: proximity_threshold={}m, search_margin={:?}\n",
        visit_config.proximity_threshold, visit_config.search_margin
    );

    for visit in find_visited_summits(&catalogue, &trail, &visit_config) {
        println!("   {} at {:.1}m", visit.summit.name, visit.min_distance);
    }
    println!();

    let summits = report_segment("summit", || {
        let visited = find_visited_summits(&catalogue, &trail, &visit_config);
        Ok::<_, SummitError>(generate_summit_report(visited, &config))
    });

    let hour = 3600;
    let readings = [
        ("Overcast", 4.2, 0.5, 14.0, 26.1),
        ("Light snow", 2.9, -1.8, 18.5, 31.0),
    ];
    let samples: Vec<WeatherSample> = readings
        .iter()
        .enumerate()
        .map(|(i, &(condition, temp_c, feelslike_c, wind_mph, gust_mph))| WeatherSample {
            time: (10 + i as i64) * hour,
            condition: condition.to_string(),
            temp_c,
            feelslike_c,
            wind_mph,
            gust_mph,
        })
        .collect();
    let weather = report_segment("weather", || {
        Ok::<_, SummitError>(summarise_weather(&samples, 10 * hour + 600, 10 * hour + 3000))
    });

    match combine_reports([summits, weather]) {
        Some(description) => println!("{}", description),
        None => println!("Nothing to report"),
    }
}
