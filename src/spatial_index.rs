//! Two-tier R*-tree index over timezone polygons.
//!
//! Land and ocean zones live in separate trees. Ocean zones are few and very
//! large, so keeping them out of the land tree keeps the candidate set of a
//! typical land query small. A lookup prunes by bounding box first and only
//! runs the exact ray-casting test on boxes that cover the query point.
//!
//! # Example
//!
//! ```rust
//! use geotz::{IndexBuilder, Polygon, TimezoneRecord, Vertex};
//!
//! let square: Polygon = [
//!     Vertex::new(40.0, 10.0),
//!     Vertex::new(40.0, 15.0),
//!     Vertex::new(45.0, 15.0),
//!     Vertex::new(45.0, 10.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut builder = IndexBuilder::new();
//! builder.add_record(TimezoneRecord::new("Europe/Rome", vec![square]));
//! let index = builder.build();
//!
//! assert_eq!(index.lookup(41.9028, 12.4964), Some("Europe/Rome"));
//! assert_eq!(index.lookup(0.0, 0.0), None);
//! ```

use crate::compute::validation::validate_coordinates;
use crate::config::{Config, DEFAULT_OCEAN_PREFIX};
use crate::error::Result;
use crate::types::{Coords, IndexStats, Location, TimezoneRecord, Vertex};
use rstar::{AABB, RTree, RTreeObject};
use std::sync::Arc;

/// Checks whether a timezone name denotes an ocean zone under
/// [`DEFAULT_OCEAN_PREFIX`]. Indexes built with a custom prefix answer through
/// [`TimezoneIndex::is_ocean`].
pub fn is_ocean(name: &str) -> bool {
    name.starts_with(DEFAULT_OCEAN_PREFIX)
}

/// Which of the two trees to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Land,
    Sea,
}

/// One polygon's bounding box, pointing back at its owning record.
#[derive(Debug, Clone)]
pub(crate) struct ZoneEntry {
    envelope: AABB<[f64; 2]>,
    zone: Arc<TimezoneRecord>,
}

impl ZoneEntry {
    pub(crate) fn new(min: [f64; 2], max: [f64; 2], zone: Arc<TimezoneRecord>) -> Self {
        Self {
            envelope: AABB::from_corners(min, max),
            zone,
        }
    }
}

impl RTreeObject for ZoneEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable, thread-safe timezone index.
///
/// Built once by [`crate::IndexBuilder`] and queried concurrently without
/// locking. To pick up a new dataset, build a new index and swap it in through
/// [`crate::SharedIndex`].
pub struct TimezoneIndex {
    land: RTree<ZoneEntry>,
    sea: RTree<ZoneEntry>,
    config: Config,
    stats: IndexStats,
}

impl TimezoneIndex {
    pub(crate) fn from_entries(
        land: Vec<ZoneEntry>,
        sea: Vec<ZoneEntry>,
        config: Config,
        stats: IndexStats,
    ) -> Self {
        Self {
            land: RTree::bulk_load(land),
            sea: RTree::bulk_load(sea),
            config,
            stats,
        }
    }

    /// Resolves a coordinate to a timezone name, or `None` when no polygon
    /// contains it.
    ///
    /// The land tree is searched first and the ocean tree only when no land
    /// polygon matches. Within a tree the first containing polygon in visit
    /// order wins.
    pub fn lookup(&self, lat: f64, lon: f64) -> Option<&str> {
        self.lookup_in(Tier::Land, lat, lon)
            .or_else(|| self.lookup_in(Tier::Sea, lat, lon))
    }

    /// Searches a single tree.
    pub fn lookup_in(&self, tier: Tier, lat: f64, lon: f64) -> Option<&str> {
        let point = Vertex::new(lat, lon);

        self.candidates(tier, lat, lon)
            .find(|entry| entry.zone.contains(point))
            .map(|entry| entry.zone.name.as_str())
    }

    /// Entries whose bounding box covers the point, capped at `max_candidates`
    /// when one is configured.
    fn candidates(&self, tier: Tier, lat: f64, lon: f64) -> impl Iterator<Item = &ZoneEntry> {
        let probe = AABB::from_point([lat, lon]);
        self.tree(tier)
            .locate_in_envelope_intersecting(&probe)
            .take(self.config.max_candidates.unwrap_or(usize::MAX))
    }

    /// Whether `name` is routed to the ocean tree under this index's prefix.
    pub fn is_ocean(&self, name: &str) -> bool {
        name.starts_with(&self.config.ocean_prefix)
    }

    /// Validates the coordinate, then resolves it.
    ///
    /// Out-of-range or non-finite input is an error; a valid coordinate that
    /// falls in no zone is `Ok(None)`.
    pub fn locate(&self, lat: f64, lon: f64) -> Result<Option<Location>> {
        validate_coordinates(lat, lon)?;

        Ok(self.lookup(lat, lon).map(|tz| Location {
            tz: tz.to_string(),
            coords: Coords { lat, lon },
        }))
    }

    /// Number of indexed polygons across both trees.
    pub fn len(&self) -> usize {
        self.land.size() + self.sea.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tier_len(&self, tier: Tier) -> usize {
        self.tree(tier).size()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn tree(&self, tier: Tier) -> &RTree<ZoneEntry> {
        match tier {
            Tier::Land => &self.land,
            Tier::Sea => &self.sea,
        }
    }
}

impl Default for TimezoneIndex {
    fn default() -> Self {
        Self::from_entries(
            Vec::new(),
            Vec::new(),
            Config::default(),
            IndexStats::default(),
        )
    }
}

impl std::fmt::Debug for TimezoneIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimezoneIndex")
            .field("land", &self.land.size())
            .field("sea", &self.sea.size())
            .field("config", &self.config)
            .finish()
    }
}
