//! Geometry primitives shared by the decoder, the builder and the index.
//!
//! All coordinates are stored as `(lat, lng)` in degrees. GeoJSON input is
//! `[lng, lat]` and is swapped by the decoder before it reaches these types.

use crate::compute::ray_cast;
use serde::{Deserialize, Serialize};

/// A polygon vertex in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub lat: f64,
    pub lng: f64,
}

impl Vertex {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned bounding box in (latitude, longitude) space.
///
/// An empty box has inverted infinite bounds so that the first call to
/// [`BoundingBox::extend`] makes it tight around that vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min_lat: f64::INFINITY,
        min_lng: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        max_lng: f64::NEG_INFINITY,
    };

    pub fn extend(&mut self, lat: f64, lng: f64) {
        if lat > self.max_lat {
            self.max_lat = lat;
        }
        if lat < self.min_lat {
            self.min_lat = lat;
        }
        if lng > self.max_lng {
            self.max_lng = lng;
        }
        if lng < self.min_lng {
            self.min_lng = lng;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    /// Inclusive containment check.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }

    pub fn min_corner(&self) -> [f64; 2] {
        [self.min_lat, self.min_lng]
    }

    pub fn max_corner(&self) -> [f64; 2] {
        [self.max_lat, self.max_lng]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Outer ring of a timezone boundary. The ring is implicitly closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    bbox: BoundingBox,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            bbox: BoundingBox::EMPTY,
        }
    }

    /// Append a vertex, growing the bounding box to enclose it.
    pub fn add_vertex(&mut self, lat: f64, lng: f64) {
        self.bbox.extend(lat, lng);
        self.vertices.push(Vertex::new(lat, lng));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Exact containment test, see [`ray_cast::contains`].
    pub fn contains(&self, point: Vertex) -> bool {
        ray_cast::contains(&self.vertices, point)
    }
}

impl FromIterator<Vertex> for Polygon {
    fn from_iter<I: IntoIterator<Item = Vertex>>(iter: I) -> Self {
        let mut polygon = Polygon::new();
        for v in iter {
            polygon.add_vertex(v.lat, v.lng);
        }
        polygon
    }
}

/// A named timezone and the outer rings that make up its territory.
#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneRecord {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

impl TimezoneRecord {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            polygons,
        }
    }

    /// Whether any of the record's polygons contains `point`. Polygons whose
    /// own bounding box misses the point are skipped without a ray cast.
    pub fn contains(&self, point: Vertex) -> bool {
        self.polygons
            .iter()
            .any(|p| p.bbox().contains(point.lat, point.lng) && p.contains(point))
    }
}

/// Query coordinates echoed back with a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved timezone for a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub tz: String,
    pub coords: Coords,
}

/// Counters collected while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    pub land_polygons: usize,
    pub sea_polygons: usize,
    pub skipped_polygons: usize,
}

impl IndexStats {
    pub fn polygons(&self) -> usize {
        self.land_polygons + self.sea_polygons
    }
}
