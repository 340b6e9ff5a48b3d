//! The [`Source`] trait and its archive implementation.

use std::collections::BTreeSet;
use std::path::Path;

use bytes::Bytes;
use fife_types::file::{Archive, ArchiveKind, FifeFileError};

use crate::VfsError;

/// Something files can be read from.
///
/// Paths are matched case-insensitively and may use either separator.
pub trait Source: Send + Sync {
	/// Human readable name used in log messages.
	fn name(&self) -> &str;

	/// Returns `true` if `path` can be opened from this source.
	fn file_exists(&self, path: &str) -> bool;

	/// Reads the whole file, decompressing it if needed.
	fn open(&self, path: &str) -> Result<Bytes, VfsError>;

	/// Names of the files directly inside `path`.
	fn list_files(&self, path: &str) -> BTreeSet<String>;

	/// Names of the directories directly inside `path`.
	fn list_directories(&self, path: &str) -> BTreeSet<String>;
}

impl std::fmt::Debug for dyn Source {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Source({})", self.name())
	}
}

/// A DAT archive exposed as a [`Source`].
#[derive(Debug, Clone)]
pub struct ArchiveSource {
	name: String,
	archive: Archive,
}

impl ArchiveSource {
	/// Wraps a parsed archive.
	pub fn new(name: impl Into<String>, archive: Archive) -> Self {
		Self {
			name: name.into(),
			archive,
		}
	}

	/// Parses an archive from memory.
	pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>, kind: ArchiveKind) -> Result<Self, VfsError> {
		Ok(Self::new(name, Archive::from_bytes(data, kind)?))
	}

	/// Reads and parses an archive from disk.
	pub fn load(path: impl AsRef<Path>, kind: ArchiveKind) -> Result<Self, VfsError> {
		let path = path.as_ref();
		let archive = Archive::load(path, kind)?;
		Ok(Self::new(path.display().to_string(), archive))
	}

	/// The wrapped archive.
	pub fn archive(&self) -> &Archive {
		&self.archive
	}
}

impl Source for ArchiveSource {
	fn name(&self) -> &str {
		&self.name
	}

	fn file_exists(&self, path: &str) -> bool {
		self.archive.file_exists(path)
	}

	fn open(&self, path: &str) -> Result<Bytes, VfsError> {
		match self.archive.open(path) {
			Ok(data) => Ok(Bytes::from(data)),
			Err(FifeFileError::NotFound(name)) => Err(VfsError::NotFound(name)),
			Err(error) => Err(error.into()),
		}
	}

	fn list_files(&self, path: &str) -> BTreeSet<String> {
		self.archive.list_files(path)
	}

	fn list_directories(&self, path: &str) -> BTreeSet<String> {
		self.archive.list_directories(path)
	}
}
