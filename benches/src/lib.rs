//! Benchmark helper utilities for fife-fallout
//!
//! This module provides generators for synthetic test data shared by the
//! benchmarks. No game files are needed: archives, LZSS streams and sprites
//! are produced with the writers in `fife_types`.

use std::sync::Arc;

use fife_types::file::{
	AnimatedPalette, ArchiveBuilder, ArchiveKind, Color, ColorOverride, FrameSpec, FrmBuilder, FrmContext, Palette,
	lzss,
};

/// First index of the slime block in the Fallout palette
pub const SLIME_INDEX: u8 = 229;

/// Generates data resembling game text and scripts.
///
/// Repeated words give the encoder back references of varying distance
/// while the counter keeps the stream from collapsing into one long run.
pub fn generate_text(len: usize) -> Vec<u8> {
	const WORDS: [&str; 8] = ["{100}", "{}", "Vault", "Dweller", "water", "chip", "Shady", "Sands"];
	let mut data = Vec::with_capacity(len + 16);
	let mut counter = 0usize;
	while data.len() < len {
		data.extend_from_slice(WORDS[counter % WORDS.len()].as_bytes());
		data.push(b' ');
		if counter % 7 == 0 {
			data.extend_from_slice(counter.to_string().as_bytes());
			data.push(b'\n');
		}
		counter += 1;
	}
	data.truncate(len);
	data
}

/// Generates an LZSS stream together with the bytes it decodes to.
pub fn generate_lzss_stream(len: usize) -> (Vec<u8>, Vec<u8>) {
	let original = generate_text(len);
	(lzss::encode(&original), original)
}

/// Generates sprite pixels: a diagonal gradient with a transparent border.
///
/// With `animated` set a band of slime indices is added so decoding
/// produces one image per block frame.
pub fn generate_sprite_pixels(width: u16, height: u16, animated: bool) -> Vec<u8> {
	let (width, height) = (usize::from(width), usize::from(height));
	let mut pixels = Vec::with_capacity(width * height);
	for y in 0..height {
		for x in 0..width {
			let index = if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
				0
			} else if animated && y == height / 2 {
				SLIME_INDEX + (x % 4) as u8
			} else {
				1 + ((x + y) % 200) as u8
			};
			pixels.push(index);
		}
	}
	pixels
}

/// Generates an FRM with one set of frames shared by all six directions.
pub fn generate_frm(width: u16, height: u16, frames: usize, animated: bool) -> Vec<u8> {
	let pixels = generate_sprite_pixels(width, height, animated);
	let specs = (0..frames)
		.map(|frame| FrameSpec::new(width, height, (frame % 3) as i16, 0, pixels.clone()))
		.collect();

	let mut builder = FrmBuilder::new(10);
	builder.direction(0, specs);
	builder.build().unwrap_or_default()
}

/// Generates a palette with distinct values in every 6-bit component.
pub fn generate_palette() -> Palette {
	let colors = std::array::from_fn(|index| {
		let index = index as u8;
		Color::rgb(index % 64, (index / 4) % 64, 63 - index % 64)
	});
	Palette::from_colors(colors)
}

/// Decoding context over the Fallout animated palette.
pub fn generate_context(translucent: bool) -> FrmContext {
	let context = FrmContext::new(Arc::new(AnimatedPalette::fallout(generate_palette())));
	if !translucent {
		return context;
	}
	let mut color_override = ColorOverride::new();
	color_override.add_override(1, Color::new(255, 0, 0, 128));
	context.with_override(color_override)
}

/// Generates an archive holding `count` compressed text files.
pub fn generate_archive(kind: ArchiveKind, count: usize, file_len: usize) -> Vec<u8> {
	let mut builder = ArchiveBuilder::new();
	for file in 0..count {
		builder.add_compressed_file(&format!("text\\english\\dialog\\file{file:04}.msg"), generate_text(file_len));
	}
	builder.build(kind).unwrap_or_default()
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Inventory icon
	pub const ICON: (u16, u16) = (32, 32);
	/// Critter frame
	pub const CRITTER: (u16, u16) = (80, 120);
	/// Interface panel
	pub const PANEL: (u16, u16) = (640, 100);
	/// Full screen splash
	pub const SPLASH: (u16, u16) = (640, 480);

	/// Small archive entry
	pub const SMALL_FILE: usize = 4 * 1024;
	/// Large archive entry
	pub const LARGE_FILE: usize = 256 * 1024;
}

#[cfg(test)]
mod tests {
	use fife_types::file::{Archive, Dat2Compression, FrmFile, RawData};

	use super::*;

	#[test]
	fn test_generate_lzss_stream() {
		let (packed, original) = generate_lzss_stream(sizes::SMALL_FILE);
		assert_eq!(original.len(), sizes::SMALL_FILE);
		assert!(packed.len() < original.len());

		let mut output = vec![0u8; original.len()];
		let written = lzss::decode(&mut RawData::new(packed), &mut output).unwrap();
		assert_eq!(written, original.len());
		assert_eq!(output, original);
	}

	#[test]
	fn test_generate_frm() {
		let (width, height) = sizes::CRITTER;
		let sprite = FrmFile::from_bytes(generate_frm(width, height, 4, true), generate_context(false)).unwrap();
		assert_eq!(sprite.frames_per_direction(), 4);
		assert_eq!(sprite.num_directions(), 1);
		assert!(!sprite.frame(0, 0).unwrap().is_animated());
	}

	#[test]
	fn test_generate_animated_frm() {
		let (width, height) = sizes::ICON;
		let sprite = FrmFile::from_bytes(generate_frm(width, height, 1, true), generate_context(false)).unwrap();
		assert_eq!(sprite.frame(0, 0).unwrap().frame_count(), 4);
	}

	#[test]
	fn test_generate_archive() {
		let data = generate_archive(ArchiveKind::Dat2(Dat2Compression::Zlib), 3, 128);
		let archive = Archive::from_bytes(data, ArchiveKind::Dat2(Dat2Compression::Zlib)).unwrap();
		assert_eq!(archive.len(), 3);
		assert_eq!(archive.open("text/english/dialog/file0002.msg").unwrap(), generate_text(128));
	}
}
