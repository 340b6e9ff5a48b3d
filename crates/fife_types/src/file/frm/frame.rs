//! Frame geometry and decoded frame images.

use std::sync::OnceLock;

use image::{Rgba, RgbaImage};

use crate::file::Color;

/// Geometry of one frame plus its lazily decoded image.
#[derive(Debug, Clone)]
pub struct FrameInfo {
	/// Frame width in pixels
	pub width: u16,
	/// Frame height in pixels
	pub height: u16,
	/// Running sum of the x deltas of this direction up to this frame
	pub x_offset: i16,
	/// Running sum of the y deltas of this direction up to this frame
	pub y_offset: i16,
	/// Absolute position of the pixel indices in the file
	pub position: usize,
	pub(super) decoded: OnceLock<DecodedFrame>,
}

impl FrameInfo {
	/// Creates geometry for a frame whose pixels start at `position`.
	pub fn new(width: u16, height: u16, x_offset: i16, y_offset: i16, position: usize) -> Self {
		Self {
			width,
			height,
			x_offset,
			y_offset,
			position,
			decoded: OnceLock::new(),
		}
	}

	/// Number of pixels.
	pub fn pixel_count(&self) -> usize {
		usize::from(self.width) * usize::from(self.height)
	}

	/// Returns `true` once the frame was decoded.
	pub fn is_decoded(&self) -> bool {
		self.decoded.get().is_some()
	}
}

/// Pixel storage of a decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageData {
	/// Palette indices with their resolved colors. Index 0 is transparent.
	Indexed {
		/// One palette index per pixel, row major
		pixels: Vec<u8>,
		/// Resolved color of every index
		palette: Box<[Color; 256]>,
	},
	/// Resolved RGBA bytes, row major
	Rgba(Vec<u8>),
}

impl ImageData {
	/// Converts to RGBA bytes.
	pub fn to_rgba(&self) -> Vec<u8> {
		match self {
			Self::Indexed {
				pixels,
				palette,
			} => pixels
				.iter()
				.flat_map(|&index| {
					if index == 0 {
						Color::transparent().to_array()
					} else {
						palette[usize::from(index)].to_array()
					}
				})
				.collect(),
			Self::Rgba(bytes) => bytes.clone(),
		}
	}

	/// Returns `true` for indexed data.
	pub fn is_indexed(&self) -> bool {
		matches!(self, Self::Indexed { .. })
	}
}

/// A decoded frame ready to be handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
	width: u16,
	height: u16,
	x_shift: i16,
	y_shift: i16,
	data: ImageData,
}

impl Image {
	/// Creates an image. `data` must hold `width * height` pixels.
	pub fn new(width: u16, height: u16, x_shift: i16, y_shift: i16, data: ImageData) -> Self {
		Self {
			width,
			height,
			x_shift,
			y_shift,
			data,
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Horizontal placement offset.
	pub fn x_shift(&self) -> i16 {
		self.x_shift
	}

	/// Vertical placement offset.
	pub fn y_shift(&self) -> i16 {
		self.y_shift
	}

	/// Pixel storage.
	pub fn data(&self) -> &ImageData {
		&self.data
	}

	/// Color of the pixel at `(x, y)`.
	pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let i = usize::from(y) * usize::from(self.width) + usize::from(x);
		match &self.data {
			ImageData::Indexed {
				pixels,
				palette,
			} => pixels.get(i).map(|&index| {
				if index == 0 {
					Color::transparent()
				} else {
					palette[usize::from(index)]
				}
			}),
			ImageData::Rgba(bytes) => bytes
				.get(i * 4..i * 4 + 4)
				.map(|c| Color::new(c[0], c[1], c[2], c[3])),
		}
	}

	/// Converts to RGBA bytes.
	pub fn to_rgba(&self) -> Vec<u8> {
		self.data.to_rgba()
	}

	/// Converts to an [`RgbaImage`] for rendering or export.
	pub fn to_rgba_image(&self) -> RgbaImage {
		RgbaImage::from_fn(u32::from(self.width), u32::from(self.height), |x, y| {
			Rgba(self.pixel(x as u16, y as u16).unwrap_or_default().to_array())
		})
	}
}

/// Frames produced by cycling one animated palette block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
	/// Name of the animated block
	pub block: String,
	/// Milliseconds per frame
	pub frame_duration: u32,
	/// One image per rotation step
	pub frames: Vec<Image>,
}

/// Result of decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFrame {
	/// A single image
	Static(Image),
	/// A palette animation of the same pixels
	Animated(Animation),
}

impl DecodedFrame {
	/// Returns `true` for a palette animation.
	pub fn is_animated(&self) -> bool {
		matches!(self, Self::Animated(_))
	}

	/// Number of images.
	pub fn frame_count(&self) -> usize {
		match self {
			Self::Static(_) => 1,
			Self::Animated(animation) => animation.frames.len(),
		}
	}

	/// All images in display order.
	pub fn images(&self) -> &[Image] {
		match self {
			Self::Static(image) => std::slice::from_ref(image),
			Self::Animated(animation) => &animation.frames,
		}
	}

	/// The first image.
	pub fn first_image(&self) -> Option<&Image> {
		self.images().first()
	}
}
