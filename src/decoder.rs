//! Streaming decoder for GeoJSON timezone feature collections.
//!
//! The document is never held in memory as a whole. A byte-level scan
//! locates the `"features"` array, then each element is deserialized on its
//! own and converted to a [`TimezoneRecord`]. Only the outer ring of every
//! polygon is kept; holes are dropped.
//!
//! ```rust
//! use geotz::decoder::FeatureDecoder;
//!
//! let doc = br#"{"type":"FeatureCollection","features":[
//!   {"type":"Feature","properties":{"tzid":"Test/Zone"},
//!    "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,0]]]}}
//! ]}"#;
//!
//! let records: Vec<_> = FeatureDecoder::new(&doc[..])?.collect::<Result<_, _>>()?;
//! assert_eq!(records[0].name, "Test/Zone");
//! assert_eq!(records[0].polygons[0].len(), 4);
//! # Ok::<(), geotz::TzError>(())
//! ```

use crate::error::{Result, TzError};
use crate::types::{Polygon, TimezoneRecord};
use geojson::{Feature, PolygonType, Value};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::io::{self, BufRead, BufReader, Read};
use std::iter::FusedIterator;

const FEATURES_KEY: &[u8] = b"features";
const TZID_PROPERTY: &str = "tzid";

/// Lazy iterator of timezone records from one GeoJSON document.
///
/// Finite and not restartable: once it returns `None` or an error, it stays
/// exhausted. Decode a fresh reader to scan again.
pub struct FeatureDecoder<R> {
    reader: R,
    decoded: usize,
    finished: bool,
}

impl<R: BufRead> FeatureDecoder<R> {
    /// Positions the reader just inside the `"features"` array.
    ///
    /// Fails with [`TzError::NoFeatures`] when the document has no such array.
    pub fn new(mut reader: R) -> Result<Self> {
        seek_features(&mut reader)?;
        Ok(Self {
            reader,
            decoded: 0,
            finished: false,
        })
    }

    /// Number of features decoded so far.
    pub fn decoded(&self) -> usize {
        self.decoded
    }

    fn next_record(&mut self) -> Result<Option<TimezoneRecord>> {
        skip_whitespace(&mut self.reader)?;
        match peek(&mut self.reader)? {
            None => {
                return Err(TzError::UnexpectedEof {
                    decoded: self.decoded,
                });
            }
            Some(b']') => {
                self.reader.consume(1);
                return Ok(None);
            }
            Some(b',') if self.decoded > 0 => {
                self.reader.consume(1);
                skip_whitespace(&mut self.reader)?;
            }
            Some(_) => {}
        }

        let index = self.decoded;
        // an object value ends at its closing brace, so the deserializer never
        // reads past the current feature
        let mut de = serde_json::Deserializer::from_reader(&mut self.reader);
        let feature = Feature::deserialize(&mut de)
            .map_err(|source| TzError::MalformedFeature { index, source })?;
        self.decoded += 1;

        to_record(feature, index).map(Some)
    }
}

impl<R: Read> FeatureDecoder<BufReader<R>> {
    /// Wraps an unbuffered reader, such as a zip entry.
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::new(BufReader::new(reader))
    }
}

impl<R: BufRead> Iterator for FeatureDecoder<R> {
    type Item = Result<TimezoneRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let item = self.next_record().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

impl<R: BufRead> FusedIterator for FeatureDecoder<R> {}

fn to_record(feature: Feature, index: usize) -> Result<TimezoneRecord> {
    let name = match feature.property(TZID_PROPERTY) {
        Some(JsonValue::String(tzid)) => tzid.clone(),
        _ => return Err(TzError::MissingTzid { index }),
    };

    let mut polygons = Vec::new();
    match feature.geometry.map(|geometry| geometry.value) {
        Some(Value::Polygon(rings)) => polygons.extend(outer_ring(&name, index, &rings)?),
        Some(Value::MultiPolygon(members)) => {
            polygons.reserve(members.len());
            for rings in &members {
                polygons.extend(outer_ring(&name, index, rings)?);
            }
        }
        _ => {}
    }

    Ok(TimezoneRecord { name, polygons })
}

/// Converts the first ring, swapping GeoJSON `[lng, lat]` into `(lat, lng)`.
fn outer_ring(tzid: &str, index: usize, rings: &PolygonType) -> Result<Option<Polygon>> {
    let Some(ring) = rings.first() else {
        return Ok(None);
    };

    let mut polygon = Polygon::with_capacity(ring.len());
    for position in ring {
        match position.as_slice() {
            &[lng, lat] => polygon.add_vertex(lat, lng),
            other => {
                return Err(TzError::InvalidCoordinate {
                    tzid: tzid.to_string(),
                    index,
                    got: other.len(),
                });
            }
        }
    }
    Ok(Some(polygon))
}

fn seek_features<R: BufRead>(reader: &mut R) -> Result<()> {
    while let Some(byte) = next_byte(reader)? {
        if byte != b'"' || !read_string_matches(reader, FEATURES_KEY)? {
            continue;
        }

        skip_whitespace(reader)?;
        if peek(reader)? == Some(b':') {
            reader.consume(1);
            skip_whitespace(reader)?;
        }
        if peek(reader)? == Some(b'[') {
            reader.consume(1);
            return Ok(());
        }
    }
    Err(TzError::NoFeatures)
}

/// Consumes a string body up to its closing quote and reports whether it
/// equals `expected`. The opening quote must already be consumed.
fn read_string_matches<R: BufRead>(reader: &mut R, expected: &[u8]) -> Result<bool> {
    let mut matched = 0;
    let mut is_match = true;

    loop {
        let Some(byte) = next_byte(reader)? else {
            return Err(TzError::NoFeatures);
        };
        match byte {
            b'"' => return Ok(is_match && matched == expected.len()),
            b'\\' => {
                next_byte(reader)?;
                is_match = false;
            }
            _ if is_match && expected.get(matched) == Some(&byte) => matched += 1,
            _ => is_match = false,
        }
    }
}

fn peek<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    Ok(reader.fill_buf()?.first().copied())
}

fn next_byte<R: BufRead>(reader: &mut R) -> io::Result<Option<u8>> {
    let byte = peek(reader)?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

fn skip_whitespace<R: BufRead>(reader: &mut R) -> io::Result<()> {
    while let Some(byte) = peek(reader)? {
        if !byte.is_ascii_whitespace() {
            break;
        }
        reader.consume(1);
    }
    Ok(())
}
