//! Engine settings.
//!
//! Settings come from an optional TOML file layered with `FIFE_` prefixed
//! environment variables, so `FIFE_LIGHTING_LEVEL=2` overrides
//! `lighting_level = 4` from the file. List settings read from the
//! environment are comma separated.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use fife_types::file::{Dat2Compression, LightLevel};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

mod constants {
	/// Environment variable prefix
	pub const ENV_PREFIX: &str = "FIFE";

	/// Default light level, full brightness
	pub const DEFAULT_LIGHTING_LEVEL: i64 = 4;

	/// Default palette path inside the virtual file system
	pub const DEFAULT_PALETTE: &str = "color.pal";
}

/// Settings consumed by the asset pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Light level, clamped to 1..=4 by [`Settings::light_level`]
	pub lighting_level: i64,
	/// Palette path inside the virtual file system
	pub palette: String,
	/// YAML animated palette definition inside the virtual file system.
	/// The built-in Fallout blocks are used when unset.
	pub animated_palette: Option<String>,
	/// YAML color override table on the host file system
	pub color_overrides: Option<PathBuf>,
	/// Compression scheme flagged by DAT2 type bytes
	pub dat2_compression: Dat2Compression,
	/// Archives to mount, searched after `directories`
	pub archives: Vec<PathBuf>,
	/// Loose directories to mount, searched first
	pub directories: Vec<PathBuf>,

	#[serde(skip)]
	source: Config,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			lighting_level: constants::DEFAULT_LIGHTING_LEVEL,
			palette: constants::DEFAULT_PALETTE.to_string(),
			animated_palette: None,
			color_overrides: None,
			dat2_compression: Dat2Compression::default(),
			archives: Vec::new(),
			directories: Vec::new(),
			source: Config::default(),
		}
	}
}

impl Settings {
	/// Loads settings from `path`, if given, and the environment.
	///
	/// A missing file is not an error.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut builder = Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
		}
		let config = builder
			.add_source(
				Environment::with_prefix(constants::ENV_PREFIX)
					.try_parsing(true)
					.list_separator(",")
					.with_list_parse_key("archives")
					.with_list_parse_key("directories"),
			)
			.build()?;
		Self::from_config(config)
	}

	/// Parses settings from TOML text alone.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		let config = Config::builder().add_source(File::from_str(text, FileFormat::Toml)).build()?;
		Self::from_config(config)
	}

	fn from_config(config: Config) -> Result<Self, ConfigError> {
		let mut settings: Self = config.clone().try_deserialize()?;
		settings.source = config;
		debug!(
			"Settings: {} archives, {} directories, lighting level {}",
			settings.archives.len(),
			settings.directories.len(),
			settings.lighting_level
		);
		Ok(settings)
	}

	/// The configured light level, clamped to the valid range.
	pub fn light_level(&self) -> LightLevel {
		LightLevel::new(self.lighting_level)
	}

	/// Reads any setting by key, falling back to `default` when it is
	/// missing or has the wrong type.
	pub fn read_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
		self.source.get(key).unwrap_or(default)
	}
}
