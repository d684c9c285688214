//! Fixture archives generated on the fly for the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A GeoJSON ring: `[lng, lat]` positions, first position repeated at the end.
pub type Ring = Vec<[f64; 2]>;

pub const NEW_YORK_RING_SIZES: [usize; 3] = [459, 31606, 17];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Closed ring of exactly `positions` positions approximating a circle.
pub fn circle(lat: f64, lng: f64, radius: f64, positions: usize) -> Ring {
    assert!(positions >= 4, "a closed ring needs at least 4 positions");
    let distinct = positions - 1;
    let mut ring: Ring = (0..distinct)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / distinct as f64;
            [lng + radius * angle.cos(), lat + radius * angle.sin()]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

pub fn rect(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Ring {
    vec![
        [min_lng, min_lat],
        [max_lng, min_lat],
        [max_lng, max_lat],
        [min_lng, max_lat],
        [min_lng, min_lat],
    ]
}

pub fn polygon_feature(tzid: &str, rings: Vec<Ring>) -> Value {
    json!({
        "type": "Feature",
        "properties": { "tzid": tzid },
        "geometry": { "type": "Polygon", "coordinates": rings }
    })
}

pub fn multipolygon_feature(tzid: &str, members: Vec<Vec<Ring>>) -> Value {
    json!({
        "type": "Feature",
        "properties": { "tzid": tzid },
        "geometry": { "type": "MultiPolygon", "coordinates": members }
    })
}

pub fn collection(features: Vec<Value>) -> String {
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Writes `entries` (name, contents) into a new zip archive under `dir`.
pub fn write_archive(dir: &Path, name: &str, entries: &[(&str, String)]) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).expect("create archive"));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (entry, contents) in entries {
        zip.start_file(*entry, options).expect("start entry");
        zip.write_all(contents.as_bytes()).expect("write entry");
    }
    zip.finish().expect("finish archive");
    path
}

/// Small synthetic world covering the scenarios the tests rely on.
pub fn world_features() -> Vec<Value> {
    vec![
        polygon_feature("Europe/London", vec![rect(49.0, -8.0, 59.0, 1.8)]),
        // the second ring is a hole around the Vatican and must be ignored
        polygon_feature(
            "Europe/Rome",
            vec![
                rect(36.0, 6.5, 47.0, 18.5),
                rect(41.90, 12.44, 41.91, 12.46),
            ],
        ),
        multipolygon_feature(
            "America/New_York",
            vec![
                vec![circle(40.7, -74.0, 0.5, NEW_YORK_RING_SIZES[0])],
                vec![circle(42.0, -76.0, 1.5, NEW_YORK_RING_SIZES[1])],
                vec![circle(41.0, -72.0, 0.2, NEW_YORK_RING_SIZES[2])],
            ],
        ),
        polygon_feature("Test/West", vec![rect(-30.0, 100.0, -20.0, 110.0)]),
        polygon_feature("Test/East", vec![rect(-30.0, 110.0, -20.0, 120.0)]),
        polygon_feature("Etc/GMT", vec![rect(45.0, -20.0, 65.0, 5.0)]),
        polygon_feature("Etc/GMT+2", vec![rect(20.0, -50.0, 44.0, -25.0)]),
    ]
}

pub fn world_archive(dir: &Path) -> PathBuf {
    write_archive(
        dir,
        "timezones.zip",
        &[("combined-with-oceans.json", collection(world_features()))],
    )
}

/// Points the fixture world must resolve, as (lat, lon, expected).
pub fn expected_lookups() -> Vec<(f64, f64, Option<&'static str>)> {
    vec![
        (51.477811, 0.0, Some("Europe/London")),
        (41.9028, 12.4964, Some("Europe/Rome")),
        (41.905, 12.45, Some("Europe/Rome")),
        (40.7128, -74.0060, Some("America/New_York")),
        (42.5, -76.5, Some("America/New_York")),
        (41.05, -72.0, Some("America/New_York")),
        (-25.0, 105.0, Some("Test/West")),
        (-25.0, 115.0, Some("Test/East")),
        (60.0, -10.0, Some("Etc/GMT")),
        (30.0, -40.0, Some("Etc/GMT+2")),
        (-60.0, -140.0, None),
        (0.0, 0.0, None),
    ]
}
