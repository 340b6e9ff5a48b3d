//! Per-sprite palette color overrides.
//!
//! Some Fallout sprites render better with a few palette entries replaced,
//! typically to make a backdrop index transparent. Overrides are declared in
//! a YAML table:
//!
//! ```yaml
//! overrides:
//!   - name: art/tiles/grid000.frm
//!     names: [grid001.frm]
//!     colors:
//!       - { index: 1, a: 0 }
//!       - { index: 7, r: 255, g: 0, b: 0 }
//! ```
//!
//! Values are clamped to `0..=255`. Missing color components default to 255
//! once any of `r`, `g`, `b` is given; an entry with only `a` replaces the
//! alpha alone; an entry with none of them is ignored.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::file::{Color, FifeFileError, FileType, normalize_path};

/// Fixed 256 bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct IndexSet([u64; 4]);

impl IndexSet {
	const fn new() -> Self {
		Self([0; 4])
	}

	fn set(&mut self, index: u8) {
		self.0[usize::from(index >> 6)] |= 1 << (index & 63);
	}

	fn reset(&mut self, index: u8) {
		self.0[usize::from(index >> 6)] &= !(1 << (index & 63));
	}

	fn test(&self, index: u8) -> bool {
		self.0[usize::from(index >> 6)] & (1 << (index & 63)) != 0
	}

	fn none(&self) -> bool {
		self.0.iter().all(|&word| word == 0)
	}
}

/// Overrides for the 256 palette indices of one sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOverride {
	alpha_set: IndexSet,
	color_set: IndexSet,
	colors: [Color; 256],
}

/// Override that changes nothing.
pub static EMPTY_OVERRIDE: ColorOverride = ColorOverride::new();

impl ColorOverride {
	/// Creates an empty override.
	pub const fn new() -> Self {
		Self {
			alpha_set: IndexSet::new(),
			color_set: IndexSet::new(),
			colors: [Color::transparent(); 256],
		}
	}

	/// Returns `true` if no override makes an index translucent.
	///
	/// Such sprites can still be drawn through an indexed palette surface.
	pub fn are_all_overrides_opaque(&self) -> bool {
		self.alpha_set.none()
	}

	/// Returns `true` if no index is overridden.
	pub fn is_empty(&self) -> bool {
		self.alpha_set.none() && self.color_set.none()
	}

	/// Writes the override of `index` into `color`.
	///
	/// Returns whether anything was written.
	pub fn get_override(&self, index: u8, color: &mut Color) -> bool {
		let mut result = false;
		let stored = self.colors[usize::from(index)];
		if self.alpha_set.test(index) {
			color.a = stored.a;
			result = true;
		}
		if self.color_set.test(index) {
			color.r = stored.r;
			color.g = stored.g;
			color.b = stored.b;
			result = true;
		}
		result
	}

	/// Returns `color` with the override of `index` applied.
	pub fn apply(&self, index: u8, mut color: Color) -> Color {
		self.get_override(index, &mut color);
		color
	}

	/// Replaces the color of `index`. An alpha of 255 keeps it opaque.
	pub fn add_override(&mut self, index: u8, color: Color) {
		if color.a == 255 {
			self.alpha_set.reset(index);
		} else {
			self.alpha_set.set(index);
		}
		self.color_set.set(index);
		self.colors[usize::from(index)] = color;
	}

	/// Replaces only the alpha of `index`.
	pub fn add_alpha_override(&mut self, index: u8, alpha: u8) {
		if alpha == 255 {
			self.alpha_set.reset(index);
		} else {
			self.alpha_set.set(index);
		}
		self.colors[usize::from(index)].a = alpha;
	}
}

impl Default for ColorOverride {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
	#[serde(default)]
	overrides: Vec<OverrideDefinition>,
}

#[derive(Debug, Deserialize)]
struct OverrideDefinition {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	names: Vec<String>,
	#[serde(default)]
	colors: Vec<ColorDefinition>,
}

#[derive(Debug, Deserialize)]
struct ColorDefinition {
	index: i64,
	r: Option<i64>,
	g: Option<i64>,
	b: Option<i64>,
	a: Option<i64>,
}

fn bound(value: i64) -> u8 {
	value.clamp(0, 255) as u8
}

/// Overrides keyed by normalized sprite name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
	overrides: HashMap<String, ColorOverride>,
}

impl OverrideMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a YAML override table.
	pub fn from_yaml(text: &str) -> Result<Self, FifeFileError> {
		let file: OverrideFile = serde_yaml::from_str(text)?;
		let mut map = Self::new();

		for definition in file.overrides {
			let names: Vec<String> = definition.name.into_iter().chain(definition.names).collect();
			if names.is_empty() && !definition.colors.is_empty() {
				return Err(FifeFileError::invalid_format(
					FileType::ColorOverride,
					format!("{} colors listed without a sprite name", definition.colors.len()),
				));
			}

			for color in &definition.colors {
				let index = bound(color.index);
				let found_rgb = color.r.is_some() || color.g.is_some() || color.b.is_some();
				let alpha = color.a.map_or(255, bound);

				if !found_rgb && color.a.is_none() {
					continue;
				}

				for name in &names {
					let entry = map.entry(name);
					if found_rgb {
						let rgba = Color::new(
							color.r.map_or(255, bound),
							color.g.map_or(255, bound),
							color.b.map_or(255, bound),
							alpha,
						);
						entry.add_override(index, rgba);
					} else {
						entry.add_alpha_override(index, alpha);
					}
				}
			}
		}

		debug!("Loaded color overrides for {} sprites", map.len());
		Ok(map)
	}

	/// Loads a YAML override table from disk.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FifeFileError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_yaml(&text)
	}

	/// Override for `name`, created empty if missing.
	pub fn entry(&mut self, name: &str) -> &mut ColorOverride {
		self.overrides.entry(normalize_path(name)).or_default()
	}

	/// Override registered under exactly `name`.
	pub fn get(&self, name: &str) -> Option<&ColorOverride> {
		self.overrides.get(&normalize_path(name))
	}

	/// Override for a sprite path: the full path first, then its file name.
	/// Falls back to [`EMPTY_OVERRIDE`].
	pub fn for_sprite(&self, path: &str) -> &ColorOverride {
		let path = normalize_path(path);
		let file_name = path.rsplit('/').next().unwrap_or(path.as_str());
		self.overrides
			.get(&path)
			.or_else(|| self.overrides.get(file_name))
			.unwrap_or(&EMPTY_OVERRIDE)
	}

	/// Number of sprites with overrides.
	pub fn len(&self) -> usize {
		self.overrides.len()
	}

	/// Returns `true` if no sprite has overrides.
	pub fn is_empty(&self) -> bool {
		self.overrides.is_empty()
	}
}
