//! Index configuration.

use serde::de::Error;

/// Timezones whose name starts with this prefix are indexed as ocean zones.
pub const DEFAULT_OCEAN_PREFIX: &str = "Etc/GMT";

/// Settings that shape how an index is built and queried.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name prefix routing a timezone to the ocean tree.
    #[serde(default = "Config::default_ocean_prefix")]
    pub ocean_prefix: String,

    /// Maximum bounding-box candidates tested per tree for one lookup.
    /// `None` tests every candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,
}

impl Config {
    fn default_ocean_prefix() -> String {
        DEFAULT_OCEAN_PREFIX.to_string()
    }

    pub fn with_ocean_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ocean_prefix = prefix.into();
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        assert!(max > 0, "Max candidates must be greater than zero");

        if max > 10_000 {
            log::warn!(
                "Max candidates of {} effectively disables the lookup bound; \
                dense regions may scan many polygons per query.",
                max
            );
        }

        self.max_candidates = Some(max);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_candidates == Some(0) {
            return Err("Max candidates must be greater than zero".to_string());
        }

        if self.ocean_prefix.is_empty() {
            return Err("Ocean prefix must not be empty".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocean_prefix: Self::default_ocean_prefix(),
            max_candidates: None,
        }
    }
}
