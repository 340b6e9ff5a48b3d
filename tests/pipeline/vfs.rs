use anyhow::Result;
use fife_fallout::prelude::*;

use crate::fixtures::{Scratch, archive, critter, grey_palette};

#[test_log::test]
fn test_unreadable_archive_falls_back() -> Result<()> {
	let scratch = Scratch::new("fallback")?;
	scratch.write("critter.dat", archive(ArchiveKind::Dat1, &[("art\\critters\\hmjmpsaa.frm", critter()?)])?)?;
	scratch.write("master.dat", archive(ArchiveKind::Dat1, &[("color.pal", grey_palette())])?)?;

	// valid trailer size, file list pointing outside the archive
	let mut broken = vec![0u8; 32];
	broken[24..28].copy_from_slice(&64u32.to_le_bytes());
	broken[28..32].copy_from_slice(&32u32.to_le_bytes());
	scratch.write("patch000.dat", broken)?;

	let mut settings = Settings::default();
	for name in ["patch000.dat", "missing.dat", "critter.dat", "master.dat"] {
		settings.archives.push(scratch.path().join(name));
	}
	let pipeline = AssetPipeline::from_settings(settings)?;

	assert_eq!(pipeline.vfs().len(), 2);
	assert!(pipeline.load_frm("art/critters/hmjmpsaa.frm").is_ok());

	let error = pipeline.load_frm("art/critters/hfjmpsaa.frm").unwrap_err();
	assert!(error.is_not_found());
	Ok(())
}

#[test_log::test]
fn test_missing_directory_is_an_error() -> Result<()> {
	let scratch = Scratch::new("missing_dir")?;
	let mut settings = Settings::default();
	settings.directories.push(scratch.path().join("absent"));

	let error = AssetPipeline::from_settings(settings).unwrap_err();
	assert!(matches!(error, PipelineError::Vfs(VfsError::Io { .. })));
	Ok(())
}

#[test_log::test]
fn test_listing_spans_layouts() -> Result<()> {
	let scratch = Scratch::new("listing")?;
	let dat1 = archive(
		ArchiveKind::Dat1,
		&[("art\\tiles\\floor.frm", vec![1]), ("art\\tiles\\grid\\edge.frm", vec![2])],
	)?;
	let dat2 = archive(
		ArchiveKind::Dat2(Dat2Compression::Lzss),
		&[("art\\critters\\hmjmpsaa.frm", vec![3]), ("color.pal", grey_palette())],
	)?;
	scratch.write("master.dat", dat1)?;
	scratch.write("critter.dat", dat2)?;

	let mut vfs = Vfs::fallout(Dat2Compression::Lzss);
	assert!(vfs.add_archive(scratch.path().join("master.dat")));
	assert!(vfs.add_archive(scratch.path().join("critter.dat")));

	let directories: Vec<_> = vfs.list_directories("art").into_iter().collect();
	assert_eq!(directories, ["critters", "tiles"]);
	let files: Vec<_> = vfs.list_files("./ART/TILES/").into_iter().collect();
	assert_eq!(files, ["floor.frm"]);
	assert_eq!(vfs.list_files("").into_iter().collect::<Vec<_>>(), ["color.pal"]);
	assert_eq!(&vfs.open("art/tiles/grid/edge.frm")?[..], &[2]);

	let palette = Palette::from_bytes(&vfs.open("COLOR.PAL")?)?;
	assert_eq!(palette.get(255), Color::rgb(63, 63, 63));
	Ok(())
}
