use std::sync::Arc;

use super::*;
use crate::file::{Color, Palette};

fn test_palette() -> Palette {
	let mut palette = Palette::new();
	for i in 0..=255u8 {
		palette.set(i, Color::rgb(i % 64, (i / 2) % 64, (i / 4) % 64));
	}
	palette.set(10, Color::rgb(100, 20, 0));
	palette
}

fn context() -> FrmContext {
	FrmContext::new(Arc::new(AnimatedPalette::fallout(test_palette())))
}

fn parse(data: Vec<u8>) -> File {
	File::from_bytes(data, context()).unwrap()
}

fn numbered_frames(count: u8, seed: u8) -> Vec<FrameSpec> {
	(0..count)
		.map(|i| FrameSpec::new(2 + u16::from(i), 2, i16::from(i), -i16::from(i), vec![seed + i; 2 * (2 + usize::from(i))]))
		.collect()
}

#[test]
fn test_header_fields() {
	let mut builder = Builder::new(12);
	builder
		.version(4)
		.action_frame(3)
		.shift(0, -5, 7)
		.direction(0, numbered_frames(2, 1));
	let frm = parse(builder.build().unwrap());

	assert_eq!(frm.version(), 4);
	assert_eq!(frm.frames_per_second(), 12);
	assert_eq!(frm.action_frame(), 3);
	assert_eq!(frm.frames_per_direction(), 2);
	assert_eq!(frm.shift_x(0).unwrap(), -5);
	assert_eq!(frm.shift_y(0).unwrap(), 7);
	assert_eq!(frm.header().frame_area_size as usize, 2 * 12 + 4 + 6);
}

#[test]
fn test_zero_fps_defaults_to_50() {
	let mut builder = Builder::new(0);
	builder.direction(0, vec![FrameSpec::filled(1, 1, 1)]);
	assert_eq!(parse(builder.build().unwrap()).frames_per_second(), 50);
}

#[test]
fn test_single_direction_sprite() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::filled(3, 3, 1)]);
	let frm = parse(builder.build().unwrap());

	assert_eq!(frm.num_directions(), 1);
	for direction in 1..DIRECTIONS {
		assert!(frm.is_alias(direction));
		assert_eq!(frm.frame_info(direction, 0).unwrap().width, 3);
	}
	assert!(!frm.is_alias(0));
}

#[test]
fn test_alias_directions_share_frames() {
	let mut builder = Builder::new(10);
	builder
		.direction(0, numbered_frames(3, 10))
		.direction(1, numbered_frames(3, 20))
		.direction(2, numbered_frames(3, 30))
		.direction(3, numbered_frames(3, 40))
		.alias(4, 2)
		.direction(5, numbered_frames(3, 50))
		.shift(2, 4, 4)
		.shift(4, -4, -4);
	let frm = parse(builder.build().unwrap());

	assert_eq!(frm.num_directions(), 5);
	assert!(frm.is_alias(4));
	assert!(!frm.is_alias(2));

	for f in 0..3 {
		assert_eq!(frm.frame_shift_x(2, f).unwrap(), frm.frame_shift_x(4, f).unwrap());
		assert_eq!(frm.frame_shift_y(2, f).unwrap(), frm.frame_shift_y(4, f).unwrap());
		assert_eq!(frm.frame_pixels(2, f).unwrap(), frm.frame_pixels(4, f).unwrap());

		let a = frm.frame(2, f).unwrap();
		let b = frm.frame(4, f).unwrap();
		assert_eq!(a, b);
		assert_eq!(a.first_image().unwrap().to_rgba(), b.first_image().unwrap().to_rgba());
	}

	// header shifts stay per slot
	assert_eq!(frm.shift_x(2).unwrap(), 4);
	assert_eq!(frm.shift_x(4).unwrap(), -4);
	assert_ne!(frm.frame_pixels(1, 0).unwrap(), frm.frame_pixels(2, 0).unwrap());
}

#[test]
fn test_cumulative_offsets() {
	let frames = vec![
		FrameSpec::new(1, 1, 2, 0, vec![1]),
		FrameSpec::new(1, 1, 3, -1, vec![1]),
		FrameSpec::new(1, 1, -1, 4, vec![1]),
	];
	let mut builder = Builder::new(10);
	builder.direction(0, frames.clone()).direction(1, frames);
	let frm = parse(builder.build().unwrap());

	for direction in [0, 1] {
		let shifts: Vec<(i16, i16)> = (0..3)
			.map(|f| (frm.frame_shift_x(direction, f).unwrap(), frm.frame_shift_y(direction, f).unwrap()))
			.collect();
		assert_eq!(shifts, vec![(2, 0), (5, -1), (4, 3)]);
	}

	let image = frm.frame(1, 2).unwrap().first_image().unwrap().clone();
	assert_eq!((image.x_shift(), image.y_shift()), (4, 3));
}

#[test]
fn test_frame_size_mismatch() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::filled(2, 2, 1)]);
	let mut data = builder.build().unwrap();
	data[Header::SIZE + 4..Header::SIZE + 8].copy_from_slice(&5u32.to_be_bytes());

	let result = File::from_bytes(data, context());
	assert!(matches!(
		result,
		Err(FifeFileError::InvalidFormat {
			file_type: FileType::Frm,
			..
		})
	));
}

#[test]
fn test_truncated_pixels() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::filled(4, 4, 1)]);
	let mut data = builder.build().unwrap();
	data.truncate(data.len() - 3);
	assert!(matches!(
		File::from_bytes(data, context()),
		Err(FifeFileError::IndexOverflow { .. })
	));
}

#[test]
fn test_short_header() {
	assert!(matches!(
		File::from_bytes(vec![0u8; 20], context()),
		Err(FifeFileError::InsufficientData { .. })
	));
}

#[test]
fn test_out_of_range_access() {
	let mut builder = Builder::new(10);
	builder.direction(0, numbered_frames(2, 1));
	let frm = parse(builder.build().unwrap());

	assert!(matches!(frm.shift_x(6), Err(FifeFileError::IndexOverflow { .. })));
	assert!(matches!(frm.frame(0, 2), Err(FifeFileError::IndexOverflow { .. })));
	assert!(matches!(frm.frame_shift_y(7, 0), Err(FifeFileError::IndexOverflow { .. })));
}

#[test]
fn test_frame_is_memoized() {
	let mut builder = Builder::new(10);
	builder.direction(0, numbered_frames(1, 5));
	let frm = parse(builder.build().unwrap());

	assert!(!frm.frame_info(0, 0).unwrap().is_decoded());
	let first = frm.frame(0, 0).unwrap();
	assert!(frm.frame_info(0, 0).unwrap().is_decoded());
	assert!(std::ptr::eq(first, frm.frame(0, 0).unwrap()));
	assert!(std::ptr::eq(first, frm.frame(3, 0).unwrap()));
}

#[test]
fn test_static_frame_colors() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(3, 1, 0, 0, vec![0, 10, 12])]);
	let frm = parse(builder.build().unwrap());

	let decoded = frm.frame(0, 0).unwrap();
	let DecodedFrame::Static(image) = decoded else {
		panic!("expected a static frame");
	};
	assert!(image.data().is_indexed());
	assert_eq!(image.pixel(0, 0), Some(Color::transparent()));
	// 100 * 4 saturates instead of wrapping
	assert_eq!(image.pixel(1, 0), Some(Color::rgb(255, 80, 0)));
	assert_eq!(image.pixel(2, 0), Some(Color::rgb(48, 24, 12)));
}

#[test]
fn test_light_level_from_context() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(1, 1, 0, 0, vec![10])]);
	let context = context().with_light_level(LightLevel::new(2));
	let frm = File::from_bytes(builder.build().unwrap(), context).unwrap();
	let image = frm.frame(0, 0).unwrap().first_image().unwrap().clone();
	assert_eq!(image.pixel(0, 0), Some(Color::rgb(200, 40, 0)));
}

#[test]
fn test_single_block_becomes_animation() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(4, 1, 0, 0, vec![229, 230, 231, 232])]);
	let frm = parse(builder.build().unwrap());

	let DecodedFrame::Animated(animation) = frm.frame(0, 0).unwrap() else {
		panic!("expected an animation");
	};
	assert_eq!(animation.block, "Slime");
	assert_eq!(animation.frame_duration, 200);
	assert_eq!(animation.frames.len(), 4);

	assert_eq!(animation.frames[0].pixel(0, 0), Some(Color::rgb(0, 108, 0)));
	assert_eq!(animation.frames[1].pixel(0, 0), Some(Color::rgb(11, 115, 7)));
	assert_eq!(animation.frames[1].pixel(3, 0), Some(Color::rgb(0, 108, 0)));
	assert_ne!(animation.frames[0], animation.frames[2]);
}

#[test]
fn test_two_blocks_stay_static() {
	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(3, 1, 0, 0, vec![229, 1, 240])]);
	let frm = parse(builder.build().unwrap());

	let decoded = frm.frame(0, 0).unwrap();
	assert!(!decoded.is_animated());
	assert_eq!(decoded.frame_count(), 1);
	let image = decoded.first_image().unwrap();
	assert_eq!(image.pixel(0, 0), Some(Color::rgb(0, 108, 0)));
	assert_eq!(image.pixel(2, 0), Some(Color::rgb(147, 43, 11)));
}

#[test]
fn test_multi_frame_sprites_are_not_animated() {
	let mut builder = Builder::new(10);
	builder.direction(
		0,
		vec![
			FrameSpec::new(1, 1, 0, 0, vec![229]),
			FrameSpec::new(1, 1, 0, 0, vec![230]),
		],
	);
	let frm = parse(builder.build().unwrap());
	assert!(!frm.frame(0, 0).unwrap().is_animated());
}

#[test]
fn test_translucent_override_uses_rgba() {
	let mut over = ColorOverride::new();
	over.add_alpha_override(12, 128);
	over.add_override(0, Color::rgb(1, 2, 3));

	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(3, 1, 0, 0, vec![0, 12, 13])]);
	let frm = File::from_bytes(builder.build().unwrap(), context().with_override(over)).unwrap();

	let image = frm.frame(0, 0).unwrap().first_image().unwrap().clone();
	assert!(!image.data().is_indexed());
	// the override replaces the color of index 0 but keeps it transparent
	assert_eq!(image.pixel(0, 0), Some(Color::new(1, 2, 3, 0)));
	assert_eq!(image.pixel(1, 0), Some(Color::new(48, 24, 12, 128)));
	assert_eq!(image.pixel(2, 0), Some(Color::rgb(52, 24, 12)));
}

#[test]
fn test_opaque_override_keeps_indexed_path() {
	let mut over = ColorOverride::new();
	over.add_override(13, Color::rgb(9, 9, 9));

	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(2, 1, 0, 0, vec![12, 13])]);
	let frm = File::from_bytes(builder.build().unwrap(), context().with_override(over)).unwrap();

	let image = frm.frame(0, 0).unwrap().first_image().unwrap().clone();
	assert!(image.data().is_indexed());
	assert_eq!(image.pixel(1, 0), Some(Color::rgb(9, 9, 9)));
	assert_eq!(image.to_rgba(), vec![48, 24, 12, 255, 9, 9, 9, 255]);
}

#[test]
fn test_builder_rejects_uneven_directions() {
	let mut builder = Builder::new(10);
	builder.direction(0, numbered_frames(2, 1)).direction(1, numbered_frames(3, 1));
	assert!(builder.build().is_err());

	let mut builder = Builder::new(10);
	builder.direction(0, vec![FrameSpec::new(2, 2, 0, 0, vec![1])]);
	assert!(builder.build().is_err());
}
