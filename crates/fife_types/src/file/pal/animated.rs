//! Palette color cycling.
//!
//! Fallout animates water, fire, computer screens and a few other effects by
//! rotating the colors mapped to small palette index ranges. Each range is an
//! [`AnimatedBlock`]; an [`AnimatedPalette`] combines the base palette with
//! its blocks and resolves final colors through a [`ColorResolver`].
//!
//! Resolution is a pure function of `(index, light level, active block,
//! frame)`. No decode state is stored on the palette, so one palette can be
//! shared by any number of concurrent decodes.

use log::debug;
use serde::Deserialize;

use super::{Color, LightLevel, Palette};
use crate::file::{FifeFileError, FileType};

/// A palette index range whose colors rotate over time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedBlock {
	name: String,
	start: u8,
	end: u8,
	frame_duration: u32,
	light_adjusted: bool,
	colors: Vec<Color>,
}

impl AnimatedBlock {
	/// Creates a block covering `start..=end` that cycles through `colors`.
	///
	/// `frame_duration` is in milliseconds. Light-adjusted blocks are dimmed
	/// with the light level; the others glow at constant brightness.
	pub fn new(
		name: impl Into<String>,
		start: u8,
		end: u8,
		frame_duration: u32,
		light_adjusted: bool,
		colors: Vec<Color>,
	) -> Result<Self, FifeFileError> {
		let name = name.into();
		if start > end {
			return Err(FifeFileError::invalid_format(
				FileType::AnimatedPal,
				format!("block '{name}' starts at {start} after its end {end}"),
			));
		}
		if colors.is_empty() {
			return Err(FifeFileError::invalid_format(
				FileType::AnimatedPal,
				format!("block '{name}' has no colors"),
			));
		}

		Ok(Self {
			name,
			start,
			end,
			frame_duration,
			light_adjusted,
			colors,
		})
	}

	/// Creates a block whose colors are the palette entries `start..=end`.
	///
	/// With `quarter_scale` every component is divided by 4.
	pub fn from_palette(
		name: impl Into<String>,
		start: u8,
		end: u8,
		frame_duration: u32,
		light_adjusted: bool,
		palette: &Palette,
		quarter_scale: bool,
	) -> Result<Self, FifeFileError> {
		let colors = (start..=end)
			.map(|index| {
				let color = palette.get(index);
				if quarter_scale {
					color.map_rgb(|c| c / 4)
				} else {
					color
				}
			})
			.collect();
		Self::new(name, start, end, frame_duration, light_adjusted, colors)
	}

	/// Block name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// First palette index of the block.
	pub fn start(&self) -> u8 {
		self.start
	}

	/// Last palette index of the block, inclusive.
	pub fn end(&self) -> u8 {
		self.end
	}

	/// Milliseconds each frame is shown.
	pub fn frame_duration(&self) -> u32 {
		self.frame_duration
	}

	/// Returns `true` if the block is dimmed with the light level.
	pub fn is_light_adjusted(&self) -> bool {
		self.light_adjusted
	}

	/// Number of frames in one full rotation.
	pub fn num_frames(&self) -> usize {
		self.colors.len()
	}

	/// Colors in rotation order.
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns `true` if `index` lies in the block's range.
	pub fn contains(&self, index: u8) -> bool {
		(self.start..=self.end).contains(&index)
	}

	/// Color mapped to `index` in `frame`, before light adjustment.
	pub fn color(&self, index: u8, frame: usize) -> Color {
		let position = usize::from(index.saturating_sub(self.start)) + frame;
		self.colors[position % self.colors.len()]
	}
}

/// Declarative block description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockDefinition {
	/// Block name
	pub name: String,
	/// First palette index
	pub start: u8,
	/// Last palette index, inclusive
	pub end: u8,
	/// Milliseconds per frame
	pub frame_duration: u32,
	/// Dim with the light level
	#[serde(default)]
	pub light_adjust: bool,
	/// Explicit colors; taken from the base palette when absent
	#[serde(default)]
	pub colors: Option<Vec<[u8; 3]>>,
	/// Divide palette-derived colors by 4
	#[serde(default)]
	pub quarter_scale: bool,
}

impl BlockDefinition {
	/// Builds the block, reading colors from `palette` if none are listed.
	pub fn to_block(&self, palette: &Palette) -> Result<AnimatedBlock, FifeFileError> {
		match &self.colors {
			Some(colors) => AnimatedBlock::new(
				self.name.clone(),
				self.start,
				self.end,
				self.frame_duration,
				self.light_adjust,
				colors.iter().map(|&[r, g, b]| Color::rgb(r, g, b)).collect(),
			),
			None => AnimatedBlock::from_palette(
				self.name.clone(),
				self.start,
				self.end,
				self.frame_duration,
				self.light_adjust,
				palette,
				self.quarter_scale,
			),
		}
	}
}

/// Declarative animated palette: an optional base palette name and its blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnimatedPaletteDefinition {
	/// Base palette path
	#[serde(default)]
	pub palette: Option<String>,
	/// Animated blocks, later blocks take precedence on overlap
	#[serde(default)]
	pub blocks: Vec<BlockDefinition>,
}

impl AnimatedPaletteDefinition {
	/// Parses a YAML definition.
	pub fn from_yaml(text: &str) -> Result<Self, FifeFileError> {
		Ok(serde_yaml::from_str(text)?)
	}
}

/// How an image's pixels relate to the animated blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockUsage {
	/// No pixel uses an animated index
	None,
	/// Every animated pixel belongs to this block
	Single(usize),
	/// Pixels from two or more blocks were found
	Multiple,
}

impl BlockUsage {
	/// Id of the single block in use.
	pub fn block_id(self) -> Option<usize> {
		match self {
			Self::Single(id) => Some(id),
			_ => None,
		}
	}
}

mod constants {
	use super::Color;

	pub const SLIME: [Color; 4] = [
		Color::rgb(0, 108, 0),
		Color::rgb(11, 115, 7),
		Color::rgb(27, 123, 15),
		Color::rgb(43, 131, 27),
	];

	pub const MONITORS: [Color; 5] = [
		Color::rgb(107, 107, 111),
		Color::rgb(99, 103, 127),
		Color::rgb(87, 107, 143),
		Color::rgb(0, 147, 163),
		Color::rgb(107, 187, 255),
	];

	// slow and fast fire share one block
	pub const FIRE: [Color; 10] = [
		Color::rgb(255, 0, 0),
		Color::rgb(215, 0, 0),
		Color::rgb(147, 43, 11),
		Color::rgb(255, 119, 0),
		Color::rgb(255, 59, 0),
		Color::rgb(71, 0, 0),
		Color::rgb(123, 0, 0),
		Color::rgb(179, 0, 0),
		Color::rgb(123, 0, 0),
		Color::rgb(71, 0, 0),
	];

	pub const SHORELINE: [Color; 6] = [
		Color::rgb(83, 63, 43),
		Color::rgb(75, 59, 43),
		Color::rgb(67, 55, 39),
		Color::rgb(63, 51, 39),
		Color::rgb(55, 47, 35),
		Color::rgb(51, 43, 35),
	];

	pub const BLINKING_RED: [Color; 1] = [Color::rgb(252, 0, 0)];

	/// `(name, start, end, frame duration, light adjusted, colors)`
	pub const FALLOUT_BLOCKS: [(&str, u8, u8, u32, bool, &[Color]); 5] = [
		("Slime", 229, 232, 200, true, &SLIME),
		("Monitors", 233, 237, 200, false, &MONITORS),
		("Fire", 238, 247, 180, false, &FIRE),
		("Shoreline", 248, 253, 100, true, &SHORELINE),
		("BlinkingRed", 254, 254, 33, false, &BLINKING_RED),
	];
}

/// A base palette plus its animated blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedPalette {
	palette: Palette,
	blocks: Vec<AnimatedBlock>,
	block_by_index: [Option<usize>; 256],
}

impl AnimatedPalette {
	/// Wraps a palette without any animated block.
	pub fn new(palette: Palette) -> Self {
		Self {
			palette,
			blocks: Vec::new(),
			block_by_index: [None; 256],
		}
	}

	/// Wraps a palette with the animated blocks of the Fallout games.
	pub fn fallout(palette: Palette) -> Self {
		let mut animated = Self::new(palette);
		for (name, start, end, frame_duration, light_adjusted, colors) in constants::FALLOUT_BLOCKS {
			animated.add_block(AnimatedBlock {
				name: name.to_string(),
				start,
				end,
				frame_duration,
				light_adjusted,
				colors: colors.to_vec(),
			});
		}
		animated
	}

	/// Builds the blocks of `definition` on top of `palette`.
	pub fn from_definition(palette: Palette, definition: &AnimatedPaletteDefinition) -> Result<Self, FifeFileError> {
		let mut animated = Self::new(palette);
		for block in &definition.blocks {
			let block = block.to_block(&animated.palette)?;
			debug!(
				"Animated block {} from {} to {} delay {}{}",
				block.name(),
				block.start(),
				block.end(),
				block.frame_duration(),
				if block.is_light_adjusted() {
					" light-adjusted"
				} else {
					""
				}
			);
			animated.add_block(block);
		}
		Ok(animated)
	}

	/// Parses a YAML definition and builds it on top of `palette`.
	pub fn from_yaml(palette: Palette, text: &str) -> Result<Self, FifeFileError> {
		Self::from_definition(palette, &AnimatedPaletteDefinition::from_yaml(text)?)
	}

	/// Adds a block and returns its id. Indices already claimed by an earlier
	/// block move to the new one.
	pub fn add_block(&mut self, block: AnimatedBlock) -> usize {
		let id = self.blocks.len();
		for index in block.start()..=block.end() {
			self.block_by_index[usize::from(index)] = Some(id);
		}
		self.blocks.push(block);
		id
	}

	/// The base palette.
	pub fn palette(&self) -> &Palette {
		&self.palette
	}

	/// All blocks in id order.
	pub fn blocks(&self) -> &[AnimatedBlock] {
		&self.blocks
	}

	/// Block with the given id.
	pub fn block(&self, id: usize) -> Option<&AnimatedBlock> {
		self.blocks.get(id)
	}

	/// Id of the block that owns `index`.
	pub fn block_id_at(&self, index: u8) -> Option<usize> {
		self.block_by_index[usize::from(index)]
	}

	/// Block that owns `index`.
	pub fn block_at(&self, index: u8) -> Option<&AnimatedBlock> {
		self.block_id_at(index).and_then(|id| self.blocks.get(id))
	}

	/// Classifies the animated indices used by `pixels`.
	pub fn detect(&self, pixels: &[u8]) -> BlockUsage {
		let mut usage = BlockUsage::None;
		for &index in pixels {
			let Some(id) = self.block_id_at(index) else {
				continue;
			};
			match usage {
				BlockUsage::None => usage = BlockUsage::Single(id),
				BlockUsage::Single(current) if current != id => return BlockUsage::Multiple,
				_ => {}
			}
		}
		usage
	}

	/// Creates a resolver for one frame of `active` (or a static image when `None`).
	pub fn resolver(&self, light_level: LightLevel, active: Option<usize>, frame: usize) -> ColorResolver<'_> {
		ColorResolver {
			palette: self,
			light_level,
			active,
			frame,
		}
	}

	/// Resolves a single index.
	pub fn resolve(&self, index: u8, light_level: LightLevel, active: Option<usize>, frame: usize) -> Color {
		self.resolver(light_level, active, frame).color(index)
	}
}

/// Resolves palette indices for one light level and animation frame.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
	palette: &'a AnimatedPalette,
	light_level: LightLevel,
	active: Option<usize>,
	frame: usize,
}

impl ColorResolver<'_> {
	/// Light level used by this resolver.
	pub fn light_level(&self) -> LightLevel {
		self.light_level
	}

	/// Frame of the active block.
	pub fn frame(&self) -> usize {
		self.frame
	}

	/// Final color of `index`.
	///
	/// Animated indices take their rotated block color; the rotation only
	/// advances for the active block. Other indices use the base palette
	/// scaled by the light level.
	pub fn color(&self, index: u8) -> Color {
		let Some(id) = self.palette.block_id_at(index) else {
			return self.palette.palette.get(index).map_rgb(|c| self.light_level.scale(c));
		};

		let block = &self.palette.blocks[id];
		let frame = if self.active == Some(id) {
			self.frame
		} else {
			0
		};
		let color = block.color(index, frame);
		if block.is_light_adjusted() {
			color.map_rgb(|c| self.light_level.adjust(c))
		} else {
			color
		}
	}

	/// Red component of `index`.
	pub fn red(&self, index: u8) -> u8 {
		self.color(index).r
	}

	/// Green component of `index`.
	pub fn green(&self, index: u8) -> u8 {
		self.color(index).g
	}

	/// Blue component of `index`.
	pub fn blue(&self, index: u8) -> u8 {
		self.color(index).b
	}

	/// Resolves all 256 indices.
	pub fn table(&self) -> [Color; 256] {
		std::array::from_fn(|index| self.color(index as u8))
	}
}
