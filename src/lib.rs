//! Offline resolution of geographic coordinates to IANA timezone identifiers.
//!
//! Timezone boundaries are read from a zipped GeoJSON feature collection and
//! indexed in two R*-trees, one for land zones and one for ocean zones
//! (`Etc/GMT*`). A lookup prunes candidates by bounding box and confirms them
//! with an exact ray-casting test. No geocoding service is involved.
//!
//! ```rust,no_run
//! use geotz::build_index;
//!
//! let (index, polygons) = build_index("tzdata/timezones.zip")?;
//! assert!(polygons > 0);
//!
//! assert_eq!(index.lookup(41.9028, 12.4964), Some("Europe/Rome"));
//! match index.locate(-60.0, -140.0)? {
//!     Some(location) => println!("{}", location.tz),
//!     None => println!("no timezone here"),
//! }
//! # Ok::<(), geotz::TzError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod decoder;
pub mod error;
pub mod spatial_index;
pub mod sync;
pub mod types;

pub use builder::{IndexBuilder, MIN_POLYGON_VERTICES, build_index, build_index_with_config};
pub use config::Config;
pub use decoder::FeatureDecoder;
pub use error::{Result, TzError};
pub use spatial_index::{Tier, TimezoneIndex, is_ocean};
pub use sync::SharedIndex;
pub use types::{BoundingBox, Coords, IndexStats, Location, Polygon, TimezoneRecord, Vertex};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, TzError};

    pub use crate::{IndexBuilder, SharedIndex, Tier, TimezoneIndex, build_index};

    pub use crate::{Config, Location, Vertex};
}
