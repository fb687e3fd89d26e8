//! Configuration management for the coordinate system
use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::coordinates::CoordinateSystem;
use crate::coordinates::DEFAULT_BYTE_RADII;
use crate::coordinates::DEFAULT_RESTART_MARKER;
use crate::error::Error;

/// Prefix of every environment variable read by [`Settings::new`].
pub const ENV_PREFIX: &str = "STGEOMETRY";

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> Result<(), ConfigError>;
}

/// Top-level configuration
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// The encoding space of every payload
    pub coordinate_system: CoordinateSystemConfig,
}

/// Coordinate system configuration. Decimal values are best given as
/// strings so that they are read exactly.
#[derive(Deserialize, Clone, Debug)]
pub struct CoordinateSystemConfig {
    /// Coordinate system identifier
    pub srid: i32,
    /// Coordinate system name
    pub srid_name: Option<String>,
    /// Smallest representable unit
    pub resolution: Decimal,
    /// Defaults to ten times the resolution
    pub tolerance: Option<Decimal>,
    /// X origin
    pub min_x: Decimal,
    /// Largest X
    pub max_x: Option<Decimal>,
    /// Y origin
    pub min_y: Decimal,
    /// Largest Y
    pub max_y: Option<Decimal>,
    /// Z origin; Z ordinates are rejected without it
    pub min_z: Option<Decimal>,
    /// Largest Z
    pub max_z: Option<Decimal>,
    /// Per-level multipliers
    pub byte_radii: Vec<u8>,
    /// Value added to non-terminal bytes
    pub restart_marker: u8,
}

impl CoordinateSystemConfig {
    /// Builds the coordinate system described by this configuration.
    pub fn build(&self) -> Result<CoordinateSystem, Error> {
        let mut builder =
            CoordinateSystem::builder(self.srid, self.resolution, self.min_x, self.min_y)
                .byte_radii(self.byte_radii.clone())
                .restart_marker(self.restart_marker);

        if let Some(name) = &self.srid_name {
            builder = builder.srid_name(name.clone());
        }
        if let Some(tolerance) = self.tolerance {
            builder = builder.tolerance(tolerance);
        }
        if let Some(max) = self.max_x {
            builder = builder.max_x(max);
        }
        if let Some(max) = self.max_y {
            builder = builder.max_y(max);
        }
        if let Some(min) = self.min_z {
            builder = builder.min_z(min);
        }
        if let Some(max) = self.max_z {
            builder = builder.max_z(max);
        }

        builder.build()
    }
}

impl Validatable for CoordinateSystemConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        if self.max_z.is_some() && self.min_z.is_none() {
            return Err(ConfigError::Message(
                "[coordinate_system] max_z requires min_z".to_string(),
            ));
        }

        if let Err(err) = self.build() {
            return Err(ConfigError::Message(format!("[coordinate_system] {err}")));
        }

        Ok(())
    }
}

impl Settings {
    /// Loads the settings from defaults, an optional file, then the
    /// environment. The explicit separator with double underscores is needed
    /// to correctly parse the nested config structure.
    ///
    /// The environment variables are prefixed with `STGEOMETRY_` and the
    /// nested fields are separated with double underscores (`__`).
    ///
    /// ```text
    /// STGEOMETRY_COORDINATE_SYSTEM__MIN_X
    ///    │         │               └ the `min_x` field of `CoordinateSystemConfig`
    ///    │         └ the `coordinate_system` field of `Settings`
    ///    └ with_prefix("STGEOMETRY")
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true)
            .with_list_parse_key("coordinate_system.byte_radii")
            .prefix_separator("_");

        let default_radii: Vec<i64> = DEFAULT_BYTE_RADII.iter().map(|&r| r as i64).collect();

        let mut cfg_builder = Config::builder();
        cfg_builder = cfg_builder.set_default("coordinate_system.byte_radii", default_radii)?;
        cfg_builder = cfg_builder.set_default(
            "coordinate_system.restart_marker",
            DEFAULT_RESTART_MARKER as i64,
        )?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        tracing::debug!(
            srid = settings.coordinate_system.srid,
            "loaded coordinate system settings"
        );
        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.coordinate_system.validate(self)?;

        Ok(())
    }

    /// The validated coordinate system.
    pub fn coordinate_system(&self) -> Result<CoordinateSystem, Error> {
        self.coordinate_system.build()
    }
}
