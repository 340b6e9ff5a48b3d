//! Fallout FRM sprite support.
//!
//! ## File Structure (all integers big-endian)
//!
//! | Offset | Size   | Field                                   |
//! |--------|--------|-----------------------------------------|
//! | 0x00   | 4      | version                                 |
//! | 0x04   | 2      | frames per second (0 means 50)          |
//! | 0x06   | 2      | action frame index                      |
//! | 0x08   | 2      | frames per direction                    |
//! | 0x0A   | 6 × 2  | x shift per direction                   |
//! | 0x16   | 6 × 2  | y shift per direction                   |
//! | 0x22   | 6 × 4  | frame data offset per direction         |
//! | 0x3A   | 4      | size of the frame data area             |
//! | 0x3E   | ...    | frame data                              |
//!
//! The frames of direction `d` start at `0x3E + offset[d]`. Each frame is
//!
//! | Size | Field                                    |
//! |------|------------------------------------------|
//! | 2    | width                                    |
//! | 2    | height                                   |
//! | 4    | pixel count, must equal width × height   |
//! | 2    | x delta (signed)                         |
//! | 2    | y delta (signed)                         |
//! | w×h  | palette indices                          |
//!
//! Frame offsets accumulate over the frames of a direction. Directions sharing
//! a data offset are aliases and share their frames; symmetric sprites store
//! their data once.

pub mod builder;
pub mod frame;

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, trace};

use crate::file::{
	AnimatedPalette, BlockUsage, ColorOverride, ColorResolver, FifeFileError, FileType, LightLevel,
	RawData,
};

pub use builder::{Builder, FrameSpec};
pub use frame::{Animation, DecodedFrame, FrameInfo, Image, ImageData};

/// Number of direction slots in every FRM.
pub const DIRECTIONS: usize = 6;

mod constants {
	/// Frames per second used when the header says 0
	pub const DEFAULT_FPS: u16 = 50;
}

/// FRM header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	/// Format version
	pub version: u32,
	/// Playback speed, never 0
	pub frames_per_second: u16,
	/// Frame on which an action takes effect
	pub action_frame: u16,
	/// Frames stored for each direction
	pub frames_per_direction: u16,
	/// Horizontal centering shift per direction
	pub shift_x: [i16; DIRECTIONS],
	/// Vertical centering shift per direction
	pub shift_y: [i16; DIRECTIONS],
	/// Frame data offset per direction, relative to the end of the header
	pub offsets: [u32; DIRECTIONS],
	/// Size of the frame data area
	pub frame_area_size: u32,
}

impl Header {
	/// Size of the header in bytes.
	pub const SIZE: usize = 0x3E;

	/// Reads the header at the cursor position.
	pub fn from_raw(raw: &mut RawData) -> Result<Self, FifeFileError> {
		if raw.remaining() < Self::SIZE {
			return Err(FifeFileError::insufficient_data(FileType::Frm, Self::SIZE, raw.remaining()));
		}

		let version = raw.read32_big()?;
		let mut frames_per_second = raw.read16_big()?;
		let action_frame = raw.read16_big()?;
		let frames_per_direction = raw.read16_big()?;

		if frames_per_second == 0 {
			frames_per_second = constants::DEFAULT_FPS;
		}

		let mut shift_x = [0i16; DIRECTIONS];
		for shift in &mut shift_x {
			*shift = raw.read_i16_big()?;
		}
		let mut shift_y = [0i16; DIRECTIONS];
		for shift in &mut shift_y {
			*shift = raw.read_i16_big()?;
		}
		let mut offsets = [0u32; DIRECTIONS];
		for offset in &mut offsets {
			*offset = raw.read32_big()?;
		}
		let frame_area_size = raw.read32_big()?;

		Ok(Self {
			version,
			frames_per_second,
			action_frame,
			frames_per_direction,
			shift_x,
			shift_y,
			offsets,
			frame_area_size,
		})
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(Self::SIZE);
		out.extend_from_slice(&self.version.to_be_bytes());
		out.extend_from_slice(&self.frames_per_second.to_be_bytes());
		out.extend_from_slice(&self.action_frame.to_be_bytes());
		out.extend_from_slice(&self.frames_per_direction.to_be_bytes());
		for shift in self.shift_x.iter().chain(&self.shift_y) {
			out.extend_from_slice(&shift.to_be_bytes());
		}
		for offset in &self.offsets {
			out.extend_from_slice(&offset.to_be_bytes());
		}
		out.extend_from_slice(&self.frame_area_size.to_be_bytes());
		out
	}
}

/// Everything needed to turn palette indices into colors.
#[derive(Debug, Clone)]
pub struct FrmContext {
	palette: Arc<AnimatedPalette>,
	light_level: LightLevel,
	color_override: ColorOverride,
}

impl FrmContext {
	/// Creates a context at full brightness without overrides.
	pub fn new(palette: Arc<AnimatedPalette>) -> Self {
		Self {
			palette,
			light_level: LightLevel::default(),
			color_override: ColorOverride::new(),
		}
	}

	/// Sets the light level.
	pub fn with_light_level(mut self, light_level: LightLevel) -> Self {
		self.light_level = light_level;
		self
	}

	/// Sets the sprite's color override.
	pub fn with_override(mut self, color_override: ColorOverride) -> Self {
		self.color_override = color_override;
		self
	}

	/// The animated palette.
	pub fn palette(&self) -> &AnimatedPalette {
		&self.palette
	}

	/// The light level.
	pub fn light_level(&self) -> LightLevel {
		self.light_level
	}

	/// The sprite's color override.
	pub fn color_override(&self) -> &ColorOverride {
		&self.color_override
	}
}

/// A parsed FRM sprite.
///
/// Frame geometry is read up front; pixels are decoded on first access and
/// cached for the lifetime of the sprite.
#[derive(Debug, Clone)]
pub struct File {
	data: RawData,
	header: Header,
	frames: Vec<Vec<FrameInfo>>,
	direction_map: [usize; DIRECTIONS],
	alias_of: [Option<usize>; DIRECTIONS],
	context: FrmContext,
}

impl File {
	/// Parses a sprite held in memory.
	pub fn from_bytes(data: impl Into<Bytes>, context: FrmContext) -> Result<Self, FifeFileError> {
		let mut raw = RawData::new(data);
		let header = Header::from_raw(&mut raw)?;
		debug!(
			"FRM: version {} fps {} frames per direction {}",
			header.version, header.frames_per_second, header.frames_per_direction
		);

		let mut frames = Vec::with_capacity(DIRECTIONS);
		let mut direction_map = [0usize; DIRECTIONS];
		let mut alias_of = [None; DIRECTIONS];

		for direction in 0..DIRECTIONS {
			let offset = header.offsets[direction];
			if let Some(original) = (0..direction).find(|&j| header.offsets[j] == offset) {
				direction_map[direction] = direction_map[original];
				alias_of[direction] = Some(original);
				continue;
			}

			direction_map[direction] = frames.len();
			frames.push(Self::parse_direction(&mut raw, &header, direction)?);
		}

		Ok(Self {
			data: raw,
			header,
			frames,
			direction_map,
			alias_of,
			context,
		})
	}

	/// Reads and parses a sprite from disk.
	pub fn open<P: AsRef<Path>>(path: P, context: FrmContext) -> Result<Self, FifeFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(data, context)
	}

	fn parse_direction(raw: &mut RawData, header: &Header, direction: usize) -> Result<Vec<FrameInfo>, FifeFileError> {
		let start = Header::SIZE as u64 + u64::from(header.offsets[direction]);
		if start > raw.len() as u64 {
			return Err(FifeFileError::index_overflow(start as usize, raw.len()));
		}
		raw.set_index(start as usize)?;

		let mut frames = Vec::with_capacity(usize::from(header.frames_per_direction));
		let mut x_total: i16 = 0;
		let mut y_total: i16 = 0;

		for frame in 0..header.frames_per_direction {
			let width = raw.read16_big()?;
			let height = raw.read16_big()?;
			let size = raw.read32_big()?;
			if size != u32::from(width) * u32::from(height) {
				return Err(FifeFileError::invalid_format(
					FileType::Frm,
					format!(
						"direction {direction} frame {frame}: size {size} does not match {width}x{height}"
					),
				));
			}

			x_total = x_total.wrapping_add(raw.read_i16_big()?);
			y_total = y_total.wrapping_add(raw.read_i16_big()?);

			frames.push(FrameInfo::new(width, height, x_total, y_total, raw.index()));
			raw.move_index(i64::from(size))?;
		}

		Ok(frames)
	}

	/// The header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Format version.
	pub fn version(&self) -> u32 {
		self.header.version
	}

	/// Playback speed.
	pub fn frames_per_second(&self) -> u16 {
		self.header.frames_per_second
	}

	/// Frame on which an action takes effect.
	pub fn action_frame(&self) -> u16 {
		self.header.action_frame
	}

	/// Frames in each direction.
	pub fn frames_per_direction(&self) -> u16 {
		self.header.frames_per_direction
	}

	/// Number of distinct directions stored in the file.
	pub fn num_directions(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` if `direction` reuses the frames of an earlier direction.
	pub fn is_alias(&self, direction: usize) -> bool {
		self.alias_of.get(direction).is_some_and(Option::is_some)
	}

	/// The decode context.
	pub fn context(&self) -> &FrmContext {
		&self.context
	}

	fn check_direction(direction: usize) -> Result<(), FifeFileError> {
		if direction >= DIRECTIONS {
			return Err(FifeFileError::index_overflow(direction, DIRECTIONS));
		}
		Ok(())
	}

	/// Centering shift of `direction` along x.
	pub fn shift_x(&self, direction: usize) -> Result<i16, FifeFileError> {
		Self::check_direction(direction)?;
		Ok(self.header.shift_x[direction])
	}

	/// Centering shift of `direction` along y.
	pub fn shift_y(&self, direction: usize) -> Result<i16, FifeFileError> {
		Self::check_direction(direction)?;
		Ok(self.header.shift_y[direction])
	}

	/// Geometry of a frame.
	pub fn frame_info(&self, direction: usize, frame: usize) -> Result<&FrameInfo, FifeFileError> {
		Self::check_direction(direction)?;
		let frames = &self.frames[self.direction_map[direction]];
		frames
			.get(frame)
			.ok_or_else(|| FifeFileError::index_overflow(frame, frames.len()))
	}

	/// Cumulative x offset of a frame.
	pub fn frame_shift_x(&self, direction: usize, frame: usize) -> Result<i16, FifeFileError> {
		Ok(self.frame_info(direction, frame)?.x_offset)
	}

	/// Cumulative y offset of a frame.
	pub fn frame_shift_y(&self, direction: usize, frame: usize) -> Result<i16, FifeFileError> {
		Ok(self.frame_info(direction, frame)?.y_offset)
	}

	/// Palette indices of a frame.
	pub fn frame_pixels(&self, direction: usize, frame: usize) -> Result<Bytes, FifeFileError> {
		let info = self.frame_info(direction, frame)?;
		self.data.slice(info.position, info.pixel_count())
	}

	/// Decodes a frame, or returns the cached result of an earlier call.
	///
	/// Sprites with one frame per direction become a palette animation when
	/// all their animated pixels belong to a single block.
	pub fn frame(&self, direction: usize, frame: usize) -> Result<&DecodedFrame, FifeFileError> {
		let info = self.frame_info(direction, frame)?;
		if let Some(decoded) = info.decoded.get() {
			return Ok(decoded);
		}

		let decoded = self.decode(info)?;
		Ok(info.decoded.get_or_init(|| decoded))
	}

	fn decode(&self, info: &FrameInfo) -> Result<DecodedFrame, FifeFileError> {
		let pixels = self.data.slice(info.position, info.pixel_count())?;
		let palette = self.context.palette();

		let usage = if self.header.frames_per_direction == 1 {
			palette.detect(&pixels)
		} else {
			BlockUsage::None
		};

		match usage.block_id().and_then(|id| palette.block(id).map(|block| (id, block))) {
			Some((id, block)) => {
				debug!(
					"FRM: generating animation {} with w,h= {}, {} frames: {} delay: {}",
					block.name(),
					info.width,
					info.height,
					block.num_frames(),
					block.frame_duration()
				);
				let frames = (0..block.num_frames())
					.map(|step| self.render(info, &pixels, &palette.resolver(self.context.light_level, Some(id), step)))
					.collect();
				Ok(DecodedFrame::Animated(Animation {
					block: block.name().to_string(),
					frame_duration: block.frame_duration(),
					frames,
				}))
			}
			None => {
				trace!("FRM: static frame {}x{}", info.width, info.height);
				let resolver = palette.resolver(self.context.light_level, None, 0);
				Ok(DecodedFrame::Static(self.render(info, &pixels, &resolver)))
			}
		}
	}

	fn render(&self, info: &FrameInfo, pixels: &[u8], resolver: &ColorResolver<'_>) -> Image {
		let color_override = &self.context.color_override;
		let mut table = resolver.table();

		let data = if color_override.are_all_overrides_opaque() {
			for (index, color) in table.iter_mut().enumerate() {
				color_override.get_override(index as u8, color);
			}
			ImageData::Indexed {
				pixels: pixels.to_vec(),
				palette: Box::new(table),
			}
		} else {
			let mut rgba = Vec::with_capacity(pixels.len() * 4);
			for &index in pixels {
				let mut color = table[usize::from(index)];
				color.a = if index == 0 {
					0
				} else {
					255
				};
				color_override.get_override(index, &mut color);
				rgba.extend_from_slice(&color.to_array());
			}
			ImageData::Rgba(rgba)
		};

		Image::new(info.width, info.height, info.x_offset, info.y_offset, data)
	}
}

#[cfg(test)]
mod tests;
