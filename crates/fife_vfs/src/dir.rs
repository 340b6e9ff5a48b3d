//! Loose files on the host file system.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use fife_types::file::{ArchiveEntry, ArchiveIndex, DatCompression, normalize_path};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::{Source, VfsError};

/// A host directory exposed as a [`Source`].
///
/// The tree is scanned once on creation. Host file names may use any case;
/// lookups go through the same normalization as archive paths, so
/// `ART/Critters/HMJMPSAA.FRM` on disk answers `art/critters/hmjmpsaa.frm`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	root: PathBuf,
	name: String,
	index: ArchiveIndex,
	paths: HashMap<String, PathBuf>,
}

impl DirectorySource {
	/// Scans `root` recursively.
	pub fn new(root: impl AsRef<Path>) -> Result<Self, VfsError> {
		let root = root.as_ref().to_path_buf();
		if !root.is_dir() {
			return Err(VfsError::io(
				&root,
				std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
			));
		}

		let mut index = ArchiveIndex::new();
		let mut paths = HashMap::new();

		for entry in WalkDir::new(&root) {
			let entry = match entry {
				Ok(entry) => entry,
				Err(error) => {
					warn!("Skipping unreadable entry under {}: {error}", root.display());
					continue;
				}
			};
			if !entry.file_type().is_file() {
				continue;
			}

			let Ok(relative) = entry.path().strip_prefix(&root) else {
				continue;
			};
			let Some(relative) = relative.to_str() else {
				warn!("Skipping non UTF-8 path {}", entry.path().display());
				continue;
			};

			let size = entry.metadata().map(|metadata| metadata.len()).unwrap_or(0);
			let record = ArchiveEntry::new(relative, DatCompression::None, 0, size as u32, size as u32);
			paths.insert(record.name.clone(), entry.path().to_path_buf());
			index.insert(record);
		}

		debug!("Directory {}: {} files", root.display(), index.len());

		Ok(Self {
			name: root.display().to_string(),
			root,
			index,
			paths,
		})
	}

	/// The scanned directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Number of files found.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns `true` if the directory held no files.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}
}

impl Source for DirectorySource {
	fn name(&self) -> &str {
		&self.name
	}

	fn file_exists(&self, path: &str) -> bool {
		self.paths.contains_key(&normalize_path(path))
	}

	fn open(&self, path: &str) -> Result<Bytes, VfsError> {
		let Some(host_path) = self.paths.get(&normalize_path(path)) else {
			return Err(VfsError::NotFound(path.to_string()));
		};
		fs::read(host_path).map(Bytes::from).map_err(|error| VfsError::io(host_path, error))
	}

	fn list_files(&self, path: &str) -> BTreeSet<String> {
		self.index.list_files(path)
	}

	fn list_directories(&self, path: &str) -> BTreeSet<String> {
		self.index.list_directories(path)
	}
}
