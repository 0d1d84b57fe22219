//! Index configuration for hexdex
//!
//! The configuration is read once at startup and passed explicitly into the
//! index builder; nothing in the core reads the environment.
use crate::compute::validation::{
    validate_lat_lng, validate_radius_km, validate_range, validate_resolution,
};
use crate::error::{HexdexError, Result};
use h3o::Resolution;
use serde::de::Error;

pub use hexdex_types::config::{LookupStrategy, ValueRange};
pub use hexdex_types::stats::IndexStats;

/// Index configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// H3 resolution every record's cell is stored at (0-15)
    #[serde(default = "Config::default_base_resolution")]
    pub base_resolution: u8,

    #[serde(default = "Config::default_center_latitude")]
    pub center_latitude: f64,

    #[serde(default = "Config::default_center_longitude")]
    pub center_longitude: f64,

    /// Radius of the covered disk in kilometers
    #[serde(default = "Config::default_radius_km")]
    pub radius_km: f64,

    #[serde(default)]
    pub lookup: LookupStrategy,

    /// Range synthetic `level` values are drawn from
    #[serde(default = "Config::default_level")]
    pub level: ValueRange,

    /// Range synthetic `group_id` values are drawn from
    #[serde(default = "Config::default_group_id")]
    pub group_id: ValueRange,
}

impl Config {
    const fn default_base_resolution() -> u8 {
        12
    }

    const fn default_center_latitude() -> f64 {
        56.0
    }

    const fn default_center_longitude() -> f64 {
        38.0
    }

    const fn default_radius_km() -> f64 {
        7.0
    }

    const fn default_level() -> ValueRange {
        ValueRange::new(-120, -47)
    }

    const fn default_group_id() -> ValueRange {
        ValueRange::new(0, 100)
    }

    pub fn with_base_resolution(mut self, resolution: u8) -> Self {
        self.base_resolution = resolution;
        self
    }

    /// Center point, latitude first.
    pub fn with_center(mut self, latitude: f64, longitude: f64) -> Self {
        self.center_latitude = latitude;
        self.center_longitude = longitude;
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        if radius_km > 500.0 {
            log::warn!(
                "Coverage radius of {} km is very large; ring expansion cost grows with r²",
                radius_km
            );
        }
        self.radius_km = radius_km;
        self
    }

    pub fn with_level_range(mut self, range: impl Into<ValueRange>) -> Self {
        self.level = range.into();
        self
    }

    pub fn with_group_id_range(mut self, range: impl Into<ValueRange>) -> Self {
        self.group_id = range.into();
        self
    }

    pub fn with_lookup(mut self, lookup: LookupStrategy) -> Self {
        self.lookup = lookup;
        self
    }

    /// The base resolution as an H3 [`Resolution`].
    pub fn resolution(&self) -> Result<Resolution> {
        validate_resolution(self.base_resolution).map_err(HexdexError::into_config)
    }

    pub fn validate(&self) -> Result<()> {
        self.resolution()?;
        validate_lat_lng(self.center_latitude, self.center_longitude)
            .map_err(HexdexError::into_config)?;
        validate_radius_km(self.radius_km).map_err(HexdexError::into_config)?;
        validate_range("level", &self.level).map_err(HexdexError::into_config)?;
        validate_range("group_id", &self.group_id).map_err(HexdexError::into_config)?;
        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_resolution: Self::default_base_resolution(),
            center_latitude: Self::default_center_latitude(),
            center_longitude: Self::default_center_longitude(),
            radius_km: Self::default_radius_km(),
            lookup: LookupStrategy::default(),
            level: Self::default_level(),
            group_id: Self::default_group_id(),
        }
    }
}
