//! Shared handle for serving lookups while the index can be rebuilt.
//!
//! `SharedIndex` wraps the live [`TimezoneIndex`] in `Arc<RwLock<Arc<_>>>`.
//! Readers clone the inner `Arc` and query without holding the lock. A
//! rebuild constructs the new index with no lock held and then swaps the
//! pointer, so a lookup sees either the old index or the new one in full.
//!
//! # Examples
//!
//! ```rust,no_run
//! use geotz::{Config, SharedIndex};
//! use std::thread;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shared = SharedIndex::open("tzdata/timezones.zip", Config::default())?;
//!
//! let reader = shared.clone();
//! let handle = thread::spawn(move || reader.lookup(41.9028, 12.4964));
//!
//! shared.rebuild("tzdata/timezones-2024b.zip")?;
//! assert_eq!(handle.join().unwrap().as_deref(), Some("Europe/Rome"));
//! # Ok(())
//! # }
//! ```

use crate::builder::build_index_with_config;
use crate::config::Config;
use crate::error::{Result, TzError};
use crate::spatial_index::TimezoneIndex;
use crate::types::Location;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

/// Cloneable, thread-safe handle to the current index.
#[derive(Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<Arc<TimezoneIndex>>>,
}

impl SharedIndex {
    pub fn new(index: TimezoneIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
        }
    }

    /// Builds the initial index from an archive.
    ///
    /// Fails on any build error and on an archive that yields no polygons.
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        Ok(Self::new(load(path.as_ref(), config)?))
    }

    /// Snapshot of the live index. Stays valid across later rebuilds.
    pub fn current(&self) -> Arc<TimezoneIndex> {
        Arc::clone(&self.inner.read())
    }

    pub fn lookup(&self, lat: f64, lon: f64) -> Option<String> {
        self.current().lookup(lat, lon).map(str::to_owned)
    }

    pub fn locate(&self, lat: f64, lon: f64) -> Result<Option<Location>> {
        self.current().locate(lat, lon)
    }

    /// Builds a new index from `path` with the live index's configuration and
    /// swaps it in. On error the live index is left untouched.
    pub fn rebuild<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let config = self.current().config().clone();
        let index = load(path.as_ref(), config)?;
        let size = index.len();
        self.replace(index);
        Ok(size)
    }

    /// Swaps in `index` and returns the previous one.
    pub fn replace(&self, index: TimezoneIndex) -> Arc<TimezoneIndex> {
        std::mem::replace(&mut *self.inner.write(), Arc::new(index))
    }
}

impl std::fmt::Debug for SharedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedIndex")
            .field("current", &*self.current())
            .finish()
    }
}

fn load(path: &Path, config: Config) -> Result<TimezoneIndex> {
    let (index, size) = build_index_with_config(path, config)?;
    if size == 0 {
        log::warn!("Refusing empty timezone index from {}", path.display());
        return Err(TzError::EmptyIndex);
    }
    Ok(index)
}
