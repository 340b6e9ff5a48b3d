//! FRM serialization.

use super::{DIRECTIONS, Header};
use crate::file::{FifeFileError, FileType};

/// One frame to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Offset relative to the previous frame along x
	pub dx: i16,
	/// Offset relative to the previous frame along y
	pub dy: i16,
	/// Palette indices, row major
	pub pixels: Vec<u8>,
}

impl FrameSpec {
	/// Creates a frame.
	pub fn new(width: u16, height: u16, dx: i16, dy: i16, pixels: Vec<u8>) -> Self {
		Self {
			width,
			height,
			dx,
			dy,
			pixels,
		}
	}

	/// Creates a frame filled with a single palette index.
	pub fn filled(width: u16, height: u16, index: u8) -> Self {
		Self::new(width, height, 0, 0, vec![index; usize::from(width) * usize::from(height)])
	}
}

#[derive(Debug, Clone)]
enum Slot {
	Frames(Vec<FrameSpec>),
	Alias(usize),
}

/// In-memory FRM writer.
///
/// Direction 0 starts empty and every other direction aliases it until
/// given frames of its own.
#[derive(Debug, Clone)]
pub struct Builder {
	version: u32,
	frames_per_second: u16,
	action_frame: u16,
	shift_x: [i16; DIRECTIONS],
	shift_y: [i16; DIRECTIONS],
	slots: [Slot; DIRECTIONS],
}

impl Builder {
	/// Version written by default.
	pub const DEFAULT_VERSION: u32 = 4;

	/// Creates a builder.
	pub fn new(frames_per_second: u16) -> Self {
		Self {
			version: Self::DEFAULT_VERSION,
			frames_per_second,
			action_frame: 0,
			shift_x: [0; DIRECTIONS],
			shift_y: [0; DIRECTIONS],
			slots: std::array::from_fn(|direction| {
				if direction == 0 {
					Slot::Frames(Vec::new())
				} else {
					Slot::Alias(0)
				}
			}),
		}
	}

	/// Sets the version field.
	pub fn version(&mut self, version: u32) -> &mut Self {
		self.version = version;
		self
	}

	/// Sets the action frame.
	pub fn action_frame(&mut self, action_frame: u16) -> &mut Self {
		self.action_frame = action_frame;
		self
	}

	/// Sets the centering shift of a direction. Out of range directions are ignored.
	pub fn shift(&mut self, direction: usize, x: i16, y: i16) -> &mut Self {
		if direction < DIRECTIONS {
			self.shift_x[direction] = x;
			self.shift_y[direction] = y;
		}
		self
	}

	/// Gives a direction its own frames.
	pub fn direction(&mut self, direction: usize, frames: Vec<FrameSpec>) -> &mut Self {
		if direction < DIRECTIONS {
			self.slots[direction] = Slot::Frames(frames);
		}
		self
	}

	/// Makes a direction share the frames of `target`.
	pub fn alias(&mut self, direction: usize, target: usize) -> &mut Self {
		if direction < DIRECTIONS {
			self.slots[direction] = Slot::Alias(target);
		}
		self
	}

	fn resolve(&self, direction: usize) -> Result<usize, FifeFileError> {
		let mut current = direction;
		for _ in 0..DIRECTIONS {
			match self.slots.get(current) {
				Some(Slot::Frames(_)) => return Ok(current),
				Some(Slot::Alias(target)) => current = *target,
				None => break,
			}
		}
		Err(FifeFileError::invalid_format(
			FileType::Frm,
			format!("direction {direction} does not resolve to stored frames"),
		))
	}

	/// Serializes the sprite.
	pub fn build(&self) -> Result<Vec<u8>, FifeFileError> {
		let mut frames_per_direction: Option<usize> = None;
		let mut offsets = [0u32; DIRECTIONS];
		let mut area = Vec::new();

		for (direction, slot) in self.slots.iter().enumerate() {
			let Slot::Frames(frames) = slot else {
				continue;
			};

			match frames_per_direction {
				Some(count) if count != frames.len() => {
					return Err(FifeFileError::invalid_format(
						FileType::Frm,
						format!("direction {direction} has {} frames, expected {count}", frames.len()),
					));
				}
				_ => frames_per_direction = Some(frames.len()),
			}

			offsets[direction] = area.len() as u32;
			for frame in frames {
				let size = usize::from(frame.width) * usize::from(frame.height);
				if frame.pixels.len() != size {
					return Err(FifeFileError::insufficient_data(FileType::Frm, size, frame.pixels.len()));
				}
				area.extend_from_slice(&frame.width.to_be_bytes());
				area.extend_from_slice(&frame.height.to_be_bytes());
				area.extend_from_slice(&(size as u32).to_be_bytes());
				area.extend_from_slice(&frame.dx.to_be_bytes());
				area.extend_from_slice(&frame.dy.to_be_bytes());
				area.extend_from_slice(&frame.pixels);
			}
		}

		for direction in 0..DIRECTIONS {
			if matches!(self.slots[direction], Slot::Alias(_)) {
				offsets[direction] = offsets[self.resolve(direction)?];
			}
		}

		let header = Header {
			version: self.version,
			frames_per_second: self.frames_per_second,
			action_frame: self.action_frame,
			frames_per_direction: frames_per_direction.unwrap_or(0) as u16,
			shift_x: self.shift_x,
			shift_y: self.shift_y,
			offsets,
			frame_area_size: area.len() as u32,
		};

		let mut out = header.to_bytes();
		out.extend_from_slice(&area);
		Ok(out)
	}
}
