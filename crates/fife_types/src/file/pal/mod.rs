//! Fallout palette support.
//!
//! A `.pal` file starts with 256 RGB triples (768 bytes). Fallout stores the
//! components with 6 bits of precision, so plain colors are brightened by the
//! light level when resolved (see [`LightLevel`]).

mod animated;

use std::fmt;
use std::path::Path;

use crate::file::{FifeFileError, FileType, PALETTE_FILE_SIZE, RawData};

pub use animated::{
	AnimatedBlock, AnimatedPalette, AnimatedPaletteDefinition, BlockDefinition, BlockUsage, ColorResolver,
};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Returns the components as `[r, g, b, a]`.
	pub const fn to_array(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}

	/// Applies `f` to the red, green and blue components.
	pub fn map_rgb(self, f: impl Fn(u8) -> u8) -> Self {
		Self::new(f(self.r), f(self.g), f(self.b), self.a)
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Light level used when resolving palette colors, from 1 (dark) to 4 (full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightLevel(u8);

impl LightLevel {
	/// Darkest level.
	pub const MIN: Self = Self(1);

	/// Full brightness, the reference for light-adjusted animated colors.
	pub const MAX: Self = Self(4);

	/// Creates a light level, clamping `level` into `1..=4`.
	pub fn new(level: i64) -> Self {
		Self(level.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0)) as u8)
	}

	/// Numeric value.
	pub const fn value(self) -> u8 {
		self.0
	}

	/// Scales a 6-bit palette component, saturating at 255.
	pub fn scale(self, component: u8) -> u8 {
		(u32::from(component) * u32::from(self.0)).min(255) as u8
	}

	/// Dims a full range component relative to [`LightLevel::MAX`].
	pub fn adjust(self, component: u8) -> u8 {
		(u32::from(component) * u32::from(self.0) / u32::from(Self::MAX.0)).min(255) as u8
	}
}

impl Default for LightLevel {
	fn default() -> Self {
		Self::MAX
	}
}

impl From<u8> for LightLevel {
	fn from(value: u8) -> Self {
		Self::new(i64::from(value))
	}
}

/// 256 color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	colors: [Color; 256],
}

impl Palette {
	/// Number of colors.
	pub const PALETTE_SIZE: usize = 256;

	/// Creates a palette with every entry opaque black.
	pub fn new() -> Self {
		Self {
			colors: [Color::rgb(0, 0, 0); 256],
		}
	}

	/// Creates a palette from 256 colors.
	pub fn from_colors(colors: [Color; 256]) -> Self {
		Self {
			colors,
		}
	}

	/// Loads a palette from a file.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FifeFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Parses a palette from the first 768 bytes of `data`.
	///
	/// Trailing bytes (the inverse color tables of a full Fallout palette)
	/// are ignored.
	pub fn from_bytes(data: &[u8]) -> Result<Self, FifeFileError> {
		if data.len() < PALETTE_FILE_SIZE {
			return Err(FifeFileError::invalid_format(
				FileType::Pal,
				format!("palette needs {PALETTE_FILE_SIZE} bytes, got {}", data.len()),
			));
		}

		let mut colors = [Color::default(); 256];
		for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
			*color = Color::rgb(rgb[0], rgb[1], rgb[2]);
		}

		Ok(Self {
			colors,
		})
	}

	/// Reads a palette at the cursor position.
	pub fn from_raw(raw: &mut RawData) -> Result<Self, FifeFileError> {
		if raw.remaining() < PALETTE_FILE_SIZE {
			return Err(FifeFileError::invalid_format(
				FileType::Pal,
				format!("palette needs {PALETTE_FILE_SIZE} bytes, got {}", raw.remaining()),
			));
		}
		let data = raw.read_bytes(PALETTE_FILE_SIZE)?;
		Self::from_bytes(&data)
	}

	/// Serializes the palette as 768 RGB bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
	}

	/// Color at `index`.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[usize::from(index)]
	}

	/// Color at `index`, failing with [`FifeFileError::IndexOverflow`] past 255.
	pub fn try_get(&self, index: usize) -> Result<Color, FifeFileError> {
		self.colors
			.get(index)
			.copied()
			.ok_or_else(|| FifeFileError::index_overflow(index * 3 + 2, PALETTE_FILE_SIZE))
	}

	/// Red component at `index`.
	pub fn red(&self, index: u8) -> u8 {
		self.get(index).r
	}

	/// Green component at `index`.
	pub fn green(&self, index: u8) -> u8 {
		self.get(index).g
	}

	/// Blue component at `index`.
	pub fn blue(&self, index: u8) -> u8 {
		self.get(index).b
	}

	/// All colors.
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}

	/// Sets the color at `index`.
	pub fn set(&mut self, index: u8, color: Color) {
		self.colors[usize::from(index)] = color;
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::new()
	}
}
