//! Sprite and palette loading on top of the virtual file system.

use std::sync::Arc;

use bytes::Bytes;
use fife_types::file::{
	AnimatedPalette, ColorOverride, FifeFileError, FileType, FrmContext, FrmFile, LightLevel, OverrideMap, Palette,
};
use fife_vfs::Vfs;
use log::{debug, info};

use crate::{PipelineError, Settings};

/// Owns the file system, palette and override table of one engine instance.
///
/// Everything is loaded once on construction and shared read-only between
/// the sprites loaded afterwards.
#[derive(Debug)]
pub struct AssetPipeline {
	settings: Settings,
	vfs: Vfs,
	palette: Arc<AnimatedPalette>,
	overrides: OverrideMap,
}

impl AssetPipeline {
	/// Mounts the configured directories and archives, then loads the
	/// palette and override table.
	///
	/// Archives that fail to open are skipped. A missing directory or
	/// palette is an error.
	pub fn from_settings(settings: Settings) -> Result<Self, PipelineError> {
		let mut vfs = Vfs::fallout(settings.dat2_compression);
		for directory in &settings.directories {
			vfs.add_directory(directory)?;
		}
		for archive in &settings.archives {
			vfs.add_archive(archive);
		}
		Self::with_vfs(settings, vfs)
	}

	/// Builds a pipeline over an already populated file system.
	pub fn with_vfs(settings: Settings, vfs: Vfs) -> Result<Self, PipelineError> {
		let base = Palette::from_bytes(&vfs.open(&settings.palette)?)?;

		let palette = match &settings.animated_palette {
			Some(path) => {
				let data = vfs.open(path)?;
				AnimatedPalette::from_yaml(base, utf8(&data, FileType::AnimatedPal)?)?
			}
			None => AnimatedPalette::fallout(base),
		};

		let overrides = match &settings.color_overrides {
			Some(path) => OverrideMap::open(path)?,
			None => OverrideMap::new(),
		};

		info!(
			"Asset pipeline ready: {} sources, {} palette blocks, {} color overrides",
			vfs.len(),
			palette.blocks().len(),
			overrides.len()
		);

		Ok(Self {
			settings,
			vfs,
			palette: Arc::new(palette),
			overrides,
		})
	}

	/// The settings the pipeline was built from.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// The mounted file system.
	pub fn vfs(&self) -> &Vfs {
		&self.vfs
	}

	/// The shared animated palette.
	pub fn palette(&self) -> &Arc<AnimatedPalette> {
		&self.palette
	}

	/// The color override table.
	pub fn overrides(&self) -> &OverrideMap {
		&self.overrides
	}

	/// The configured light level.
	pub fn light_level(&self) -> LightLevel {
		self.settings.light_level()
	}

	/// Reads a file from the first source holding it.
	pub fn open(&self, path: &str) -> Result<Bytes, PipelineError> {
		Ok(self.vfs.open(path)?)
	}

	/// Loads a palette other than the shared one.
	pub fn load_palette(&self, path: &str) -> Result<Palette, PipelineError> {
		Ok(Palette::from_bytes(&self.vfs.open(path)?)?)
	}

	/// Decoding context for the sprite at `path`.
	pub fn context_for(&self, path: &str) -> FrmContext {
		let color_override: &ColorOverride = self.overrides.for_sprite(path);
		FrmContext::new(Arc::clone(&self.palette))
			.with_light_level(self.light_level())
			.with_override(color_override.clone())
	}

	/// Loads a sprite with the shared palette, the configured light level and
	/// the sprite's color override.
	pub fn load_frm(&self, path: &str) -> Result<FrmFile, PipelineError> {
		let data = self.vfs.open(path)?;
		debug!("Loading sprite {path} ({} bytes)", data.len());
		Ok(FrmFile::from_bytes(data, self.context_for(path))?)
	}
}

fn utf8(data: &[u8], file_type: FileType) -> Result<&str, FifeFileError> {
	std::str::from_utf8(data).map_err(|error| FifeFileError::invalid_format(file_type, error.to_string()))
}
