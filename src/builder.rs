//! Index construction from zipped GeoJSON datasets.
//!
//! The builder streams records out of the [`FeatureDecoder`], routes each
//! polygon to the land or ocean tree and bulk-loads both trees at the end.
//! Every fallible step consumes the builder, so a failed build leaves nothing
//! behind that could be turned into a partially populated index.

use crate::config::Config;
use crate::decoder::FeatureDecoder;
use crate::error::{Result, TzError};
use crate::spatial_index::{TimezoneIndex, ZoneEntry};
use crate::types::{IndexStats, TimezoneRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use zip::ZipArchive;

/// Rings with fewer vertices than this are never indexed.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Accumulates timezone polygons before the trees are packed.
#[derive(Debug)]
pub struct IndexBuilder {
    config: Config,
    land: Vec<ZoneEntry>,
    sea: Vec<ZoneEntry>,
    stats: IndexStats,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            land: Vec::new(),
            sea: Vec::new(),
            stats: IndexStats::default(),
        }
    }

    /// Adds one bounding box for `zone` to the land or ocean set.
    pub(crate) fn insert(&mut self, min: [f64; 2], max: [f64; 2], zone: Arc<TimezoneRecord>) {
        let ocean = zone.name.starts_with(&self.config.ocean_prefix);
        let entry = ZoneEntry::new(min, max, zone);
        if ocean {
            self.sea.push(entry);
            self.stats.sea_polygons += 1;
        } else {
            self.land.push(entry);
            self.stats.land_polygons += 1;
        }
    }

    /// Indexes every usable polygon of a record and returns how many were added.
    ///
    /// Polygons with fewer than [`MIN_POLYGON_VERTICES`] vertices are dropped
    /// from the record before insertion.
    pub fn add_record(&mut self, mut record: TimezoneRecord) -> usize {
        self.stats.records += 1;

        let before = record.polygons.len();
        record
            .polygons
            .retain(|polygon| polygon.len() >= MIN_POLYGON_VERTICES);
        let skipped = before - record.polygons.len();
        if skipped > 0 {
            log::warn!(
                "Skipping {} degenerate polygon(s) of {}",
                skipped,
                record.name
            );
            self.stats.skipped_polygons += skipped;
        }

        if record.polygons.is_empty() {
            log::debug!("{} has no indexable polygons", record.name);
            return 0;
        }

        let zone = Arc::new(record);
        for polygon in &zone.polygons {
            let bbox = polygon.bbox();
            self.insert(bbox.min_corner(), bbox.max_corner(), Arc::clone(&zone));
        }
        zone.polygons.len()
    }

    /// Decodes one GeoJSON feature collection and indexes its records.
    pub fn add_features<R: BufRead>(mut self, reader: R) -> Result<Self> {
        for record in FeatureDecoder::new(reader)? {
            self.add_record(record?);
        }
        Ok(self)
    }

    /// Indexes every `.json` entry of a zip archive.
    pub fn add_archive<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;

        let mut loaded = 0;
        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if entry.is_dir() || !is_json_entry(entry.name()) {
                log::debug!("Ignoring archive entry {}", entry.name());
                continue;
            }

            let name = entry.name().to_string();
            let before = self.len();
            self = self.add_features(BufReader::new(entry))?;
            log::debug!("Loaded {} polygons from {}", self.len() - before, name);
            loaded += 1;
        }

        log::info!(
            "Indexed {} polygons ({} land, {} sea) from {} entries of {}",
            self.len(),
            self.stats.land_polygons,
            self.stats.sea_polygons,
            loaded,
            path.display()
        );
        Ok(self)
    }

    /// Polygons inserted so far.
    pub fn len(&self) -> usize {
        self.land.len() + self.sea.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Packs both trees and returns the finished index.
    pub fn build(self) -> TimezoneIndex {
        TimezoneIndex::from_entries(self.land, self.sea, self.config, self.stats)
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds an index from a zip archive with the default configuration.
///
/// Returns the index together with the number of polygons inserted. A count
/// of zero means the archive held no usable data; callers that serve lookups
/// should refuse such an index.
pub fn build_index<P: AsRef<Path>>(path: P) -> Result<(TimezoneIndex, usize)> {
    build_index_with_config(path, Config::default())
}

pub fn build_index_with_config<P: AsRef<Path>>(
    path: P,
    config: Config,
) -> Result<(TimezoneIndex, usize)> {
    config.validate().map_err(TzError::Config)?;

    let builder = IndexBuilder::with_config(config).add_archive(path)?;
    let size = builder.len();
    Ok((builder.build(), size))
}

fn is_json_entry(name: &str) -> bool {
    let name = name.as_bytes();
    name.len() >= 5 && name[name.len() - 5..].eq_ignore_ascii_case(b".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial_index::Tier;
    use crate::types::{Polygon, Vertex};

    fn polygon(points: &[(f64, f64)]) -> Polygon {
        points
            .iter()
            .map(|&(lat, lng)| Vertex::new(lat, lng))
            .collect()
    }

    fn square(lat: f64, lng: f64) -> Polygon {
        polygon(&[
            (lat, lng),
            (lat, lng + 1.0),
            (lat + 1.0, lng + 1.0),
            (lat + 1.0, lng),
        ])
    }

    #[test]
    fn test_is_json_entry() {
        assert!(is_json_entry("combined.json"));
        assert!(is_json_entry("dist/COMBINED-WITH-OCEANS.JSON"));
        assert!(is_json_entry(".json"));
        assert!(!is_json_entry("json"));
        assert!(!is_json_entry("README.md"));
        assert!(!is_json_entry("timezones.geojson.zip"));
        assert!(!is_json_entry("zoné"));
    }

    #[test]
    fn test_add_record_routes_by_prefix() {
        let mut builder = IndexBuilder::new();
        assert_eq!(
            builder.add_record(TimezoneRecord::new("Europe/Paris", vec![square(0.0, 0.0)])),
            1
        );
        assert_eq!(
            builder.add_record(TimezoneRecord::new(
                "Etc/GMT-3",
                vec![square(5.0, 5.0), square(7.0, 7.0)]
            )),
            2
        );

        let stats = builder.stats();
        assert_eq!(stats.land_polygons, 1);
        assert_eq!(stats.sea_polygons, 2);
        assert_eq!(stats.records, 2);

        let index = builder.build();
        assert_eq!(index.tier_len(Tier::Land), 1);
        assert_eq!(index.tier_len(Tier::Sea), 2);
    }

    #[test]
    fn test_custom_ocean_prefix() {
        let mut builder =
            IndexBuilder::with_config(Config::default().with_ocean_prefix("Ocean/"));
        builder.add_record(TimezoneRecord::new("Ocean/Pacific", vec![square(0.0, 0.0)]));
        builder.add_record(TimezoneRecord::new("Etc/GMT+4", vec![square(3.0, 3.0)]));

        let index = builder.build();
        assert_eq!(index.tier_len(Tier::Sea), 1);
        assert_eq!(index.lookup_in(Tier::Sea, 0.5, 0.5), Some("Ocean/Pacific"));
        assert_eq!(index.lookup_in(Tier::Land, 3.5, 3.5), Some("Etc/GMT+4"));
    }

    #[test]
    fn test_degenerate_polygons_are_never_inserted() {
        let mut builder = IndexBuilder::new();
        let inserted = builder.add_record(TimezoneRecord::new(
            "Test/Mixed",
            vec![
                Polygon::new(),
                polygon(&[(0.0, 0.0)]),
                polygon(&[(0.0, 0.0), (1.0, 1.0)]),
                square(2.0, 2.0),
            ],
        ));
        assert_eq!(inserted, 1);
        assert_eq!(builder.stats().skipped_polygons, 3);

        let inserted = builder.add_record(TimezoneRecord::new(
            "Test/Line",
            vec![polygon(&[(10.0, 10.0), (11.0, 11.0)])],
        ));
        assert_eq!(inserted, 0);

        let index = builder.build();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(10.5, 10.5), None);
        assert_eq!(index.lookup(2.5, 2.5), Some("Test/Mixed"));
    }

    #[test]
    fn test_same_name_in_many_polygons_is_kept() {
        let mut builder = IndexBuilder::new();
        builder.add_record(TimezoneRecord::new("Test/Split", vec![square(0.0, 0.0)]));
        builder.add_record(TimezoneRecord::new("Test/Split", vec![square(0.0, 0.0)]));
        builder.add_record(TimezoneRecord::new("Test/Split", vec![square(20.0, 20.0)]));

        assert_eq!(builder.len(), 3);
        let index = builder.build();
        assert_eq!(index.lookup(0.5, 0.5), Some("Test/Split"));
        assert_eq!(index.lookup(20.5, 20.5), Some("Test/Split"));
    }

    #[test]
    fn test_add_features_from_reader() {
        let doc = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"tzid":"Asia/Tokyo"},
             "geometry":{"type":"Polygon","coordinates":[[[139,35],[140,35],[140,36],[139,36],[139,35]]]}}
        ]}"#;

        let builder = IndexBuilder::new().add_features(doc.as_bytes()).unwrap();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.build().lookup(35.6762, 139.6503), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_add_features_propagates_decode_errors() {
        let result = IndexBuilder::new().add_features(r#"{"type":"FeatureCollection"}"#.as_bytes());
        assert!(matches!(result, Err(TzError::NoFeatures)));
    }

    #[test]
    fn test_build_index_missing_archive() {
        let result = build_index("/nonexistent/path/timezones.zip");
        assert!(matches!(result, Err(TzError::Io(_))));
    }

    #[test]
    fn test_build_index_rejects_invalid_config() {
        let config = Config {
            max_candidates: Some(0),
            ..Config::default()
        };
        let result = build_index_with_config("/nonexistent/timezones.zip", config);
        assert!(matches!(result, Err(TzError::Config(_))));
    }
}
