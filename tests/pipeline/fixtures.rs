use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use fife_fallout::prelude::*;

/// Index used for the body of fixture sprites
pub const BODY: u8 = 8;

/// Scratch directory removed on drop.
pub struct Scratch {
	root: PathBuf,
}

impl Scratch {
	pub fn new(name: &str) -> Result<Self> {
		let root = std::env::temp_dir().join(format!("fife_pipeline_{name}_{}", std::process::id()));
		let _ = fs::remove_dir_all(&root);
		fs::create_dir_all(&root)?;
		Ok(Self {
			root,
		})
	}

	pub fn path(&self) -> &Path {
		&self.root
	}

	pub fn write(&self, relative: &str, data: impl AsRef<[u8]>) -> Result<PathBuf> {
		let path = self.root.join(relative);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&path, data)?;
		Ok(path)
	}
}

impl Drop for Scratch {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.root);
	}
}

/// Grey ramp: index `i` holds `i / 4` in every 6-bit component.
pub fn grey_palette() -> Vec<u8> {
	(0..=255u8).flat_map(|index| [index / 4; 3]).collect()
}

/// Two frame critter with its own frames in directions 0 and 1; the other
/// four directions alias direction 0.
pub fn critter() -> Result<Vec<u8>> {
	let mut builder = FrmBuilder::new(12);
	builder
		.action_frame(1)
		.shift(0, 3, -4)
		.shift(1, 5, 6)
		.direction(0, vec![FrameSpec::filled(3, 2, BODY), FrameSpec::new(3, 2, 2, -1, vec![BODY; 6])])
		.direction(1, vec![FrameSpec::filled(2, 2, 0), FrameSpec::filled(2, 2, BODY)]);
	Ok(builder.build()?)
}

/// Single frame sprite painted with slime indices.
pub fn slime() -> Result<Vec<u8>> {
	let mut builder = FrmBuilder::new(10);
	builder.direction(0, vec![FrameSpec::new(4, 1, 0, 0, vec![0, 229, 230, BODY])]);
	Ok(builder.build()?)
}

pub fn archive(kind: ArchiveKind, files: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
	let mut builder = ArchiveBuilder::new();
	for (path, data) in files {
		builder.add_compressed_file(path, data.clone());
	}
	Ok(builder.build(kind)?)
}
