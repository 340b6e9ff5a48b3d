use anyhow::Result;
use fife_fallout::prelude::*;

use crate::fixtures::{Scratch, archive, critter, grey_palette, slime};

const OVERRIDES: &str = r#"
overrides:
  - name: art/critters/hmjmpsaa.frm
    colors:
      - { index: 8, r: 300, g: 0, b: -5 }
  - names: [glow.frm]
    colors:
      - { index: 8, a: 128 }
"#;

fn mount(scratch: &Scratch, lighting_level: i64) -> Result<AssetPipeline> {
	let master = archive(
		ArchiveKind::Dat2(Dat2Compression::Zlib),
		&[
			("color.pal", grey_palette()),
			("art\\critters\\hmjmpsaa.frm", critter()?),
			("art\\misc\\glow.frm", critter()?),
			("art\\misc\\slime.frm", slime()?),
		],
	)?;
	scratch.write("master.dat", master)?;
	scratch.write("overrides.yaml", OVERRIDES)?;

	let config = format!(
		"lighting_level = {lighting_level}\narchives = [{:?}]\ncolor_overrides = {:?}\n",
		scratch.path().join("master.dat"),
		scratch.path().join("overrides.yaml"),
	);
	let config_path = scratch.write("fife.toml", config)?;

	let settings = Settings::load(Some(&config_path))?;
	Ok(AssetPipeline::from_settings(settings)?)
}

#[test_log::test]
fn test_sprite_geometry() -> Result<()> {
	let scratch = Scratch::new("geometry")?;
	let pipeline = mount(&scratch, 4)?;
	let sprite = pipeline.load_frm("ART\\CRITTERS\\HMJMPSAA.FRM")?;

	assert_eq!(sprite.frames_per_second(), 12);
	assert_eq!(sprite.action_frame(), 1);
	assert_eq!(sprite.frames_per_direction(), 2);
	assert_eq!(sprite.num_directions(), 2);
	assert!(!sprite.is_alias(1));
	assert!(sprite.is_alias(4));
	assert_eq!(sprite.shift_x(0)?, 3);
	assert_eq!(sprite.shift_y(1)?, 6);

	assert_eq!(sprite.frame_shift_x(0, 1)?, 2);
	assert_eq!(sprite.frame_shift_y(0, 1)?, -1);
	assert_eq!(sprite.frame_pixels(4, 1)?, sprite.frame_pixels(0, 1)?);
	assert!(sprite.frame(6, 0).is_err());
	assert!(sprite.frame(0, 2).is_err());
	Ok(())
}

#[test_log::test]
fn test_opaque_override_keeps_indexed_surface() -> Result<()> {
	let scratch = Scratch::new("opaque")?;
	let pipeline = mount(&scratch, 4)?;
	assert_eq!(pipeline.overrides().len(), 2);

	let sprite = pipeline.load_frm("art/critters/hmjmpsaa.frm")?;
	let image = sprite.frame(0, 0)?.first_image().expect("static image");
	assert!(image.data().is_indexed());
	assert_eq!(image.pixel(0, 0), Some(Color::new(255, 0, 0, 255)));

	let transparent = sprite.frame(1, 0)?.first_image().expect("static image");
	assert_eq!(transparent.pixel(1, 1), Some(Color::transparent()));
	Ok(())
}

#[test_log::test]
fn test_translucent_override_by_file_name() -> Result<()> {
	let scratch = Scratch::new("translucent")?;
	let pipeline = mount(&scratch, 4)?;

	let sprite = pipeline.load_frm("art/misc/glow.frm")?;
	let image = sprite.frame(0, 0)?.first_image().expect("static image");
	assert!(!image.data().is_indexed());
	assert_eq!(image.pixel(2, 1), Some(Color::new(8, 8, 8, 128)));
	assert_eq!(&image.to_rgba()[..4], &[8, 8, 8, 128]);
	Ok(())
}

#[test_log::test]
fn test_light_level_and_palette_animation() -> Result<()> {
	let scratch = Scratch::new("slime")?;
	let pipeline = mount(&scratch, 2)?;
	assert_eq!(pipeline.light_level().value(), 2);

	let sprite = pipeline.load_frm("art/misc/slime.frm")?;
	let DecodedFrame::Animated(animation) = sprite.frame(0, 0)? else {
		panic!("slime sprite should cycle its palette");
	};
	assert_eq!(animation.block, "Slime");
	assert_eq!(animation.frame_duration, 200);
	assert_eq!(animation.frames.len(), 4);

	// slime is dimmed as c * level / 4, the body as c * level
	assert_eq!(animation.frames[0].pixel(1, 0), Some(Color::new(0, 54, 0, 255)));
	assert_eq!(animation.frames[1].pixel(1, 0), Some(Color::new(5, 57, 3, 255)));
	assert_eq!(animation.frames[0].pixel(3, 0), Some(Color::new(4, 4, 4, 255)));
	assert_eq!(animation.frames[0].pixel(0, 0), Some(Color::transparent()));
	Ok(())
}

#[test_log::test]
fn test_loose_files_shadow_archives() -> Result<()> {
	let scratch = Scratch::new("shadow")?;
	let master = archive(
		ArchiveKind::Dat1,
		&[("color.pal", grey_palette()), ("art\\critters\\hmjmpsaa.frm", critter()?)],
	)?;
	scratch.write("master.dat", master)?;
	scratch.write("data/ART/CRITTERS/HMJMPSAA.FRM", slime()?)?;

	let mut settings = Settings::default();
	settings.directories.push(scratch.path().join("data"));
	settings.archives.push(scratch.path().join("master.dat"));
	let pipeline = AssetPipeline::from_settings(settings)?;

	let sprite = pipeline.load_frm("art/critters/hmjmpsaa.frm")?;
	assert_eq!(sprite.frames_per_direction(), 1);
	assert!(sprite.frame(0, 0)?.is_animated());
	assert_eq!(pipeline.vfs().list_files("art/critters").len(), 1);
	Ok(())
}
