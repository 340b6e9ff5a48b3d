//! Ordered set of sources with fallback.

use std::collections::BTreeSet;
use std::path::Path;

use bytes::Bytes;
use fife_types::file::Dat2Compression;
use log::{info, warn};

use crate::{DirectorySource, ProviderRegistry, Source, VfsError};

/// The virtual file system.
///
/// Sources are searched in the order they were added; the first one holding
/// a path answers for it.
#[derive(Debug, Default)]
pub struct Vfs {
	registry: ProviderRegistry,
	sources: Vec<Box<dyn Source>>,
}

impl Vfs {
	/// Creates a file system using `registry` to detect archives.
	pub fn new(registry: ProviderRegistry) -> Self {
		Self {
			registry,
			sources: Vec::new(),
		}
	}

	/// Creates a file system knowing the Fallout archive layouts.
	pub fn fallout(dat2_compression: Dat2Compression) -> Self {
		Self::new(ProviderRegistry::fallout(dat2_compression))
	}

	/// The provider registry.
	pub fn registry(&self) -> &ProviderRegistry {
		&self.registry
	}

	/// Mutable access to the provider registry.
	pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
		&mut self.registry
	}

	/// Appends an already built source.
	pub fn add_source(&mut self, source: Box<dyn Source>) {
		info!("Registered source {}", source.name());
		self.sources.push(source);
	}

	/// Detects, parses and appends an archive.
	pub fn load_archive(&mut self, path: impl AsRef<Path>) -> Result<(), VfsError> {
		let source = self.registry.open(path.as_ref())?;
		self.add_source(source);
		Ok(())
	}

	/// Like [`Vfs::load_archive`], but an archive that cannot be opened is
	/// logged and skipped so the remaining sources stay usable.
	///
	/// Returns `true` if the archive was registered.
	pub fn add_archive(&mut self, path: impl AsRef<Path>) -> bool {
		let path = path.as_ref();
		match self.load_archive(path) {
			Ok(()) => true,
			Err(error) => {
				warn!("Skipping archive {}: {error}", path.display());
				false
			}
		}
	}

	/// Scans and appends a host directory.
	pub fn add_directory(&mut self, path: impl AsRef<Path>) -> Result<(), VfsError> {
		let source = DirectorySource::new(path)?;
		self.add_source(Box::new(source));
		Ok(())
	}

	/// Number of registered sources.
	pub fn len(&self) -> usize {
		self.sources.len()
	}

	/// Returns `true` if no source is registered.
	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	/// Registered sources in search order.
	pub fn sources(&self) -> impl Iterator<Item = &dyn Source> {
		self.sources.iter().map(|source| &**source)
	}

	/// Returns `true` if any source holds `path`.
	pub fn file_exists(&self, path: &str) -> bool {
		self.sources.iter().any(|source| source.file_exists(path))
	}

	/// Reads `path` from the first source holding it.
	pub fn open(&self, path: &str) -> Result<Bytes, VfsError> {
		match self.sources.iter().find(|source| source.file_exists(path)) {
			Some(source) => source.open(path),
			None => Err(VfsError::NotFound(path.to_string())),
		}
	}

	/// Union of the files directly inside `path` across every source.
	pub fn list_files(&self, path: &str) -> BTreeSet<String> {
		self.sources.iter().flat_map(|source| source.list_files(path)).collect()
	}

	/// Union of the directories directly inside `path` across every source.
	pub fn list_directories(&self, path: &str) -> BTreeSet<String> {
		self.sources.iter().flat_map(|source| source.list_directories(path)).collect()
	}
}
