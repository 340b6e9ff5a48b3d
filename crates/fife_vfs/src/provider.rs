//! Archive format detection.
//!
//! A [`ProviderRegistry`] is an ordered list of `(name, predicate, factory)`
//! triples. The first provider whose predicate accepts a file builds the
//! [`Source`] for it.

use std::path::Path;

use bytes::Bytes;
use fife_types::file::{ArchiveKind, Dat2Compression};
use log::debug;

use crate::{ArchiveSource, Source, VfsError};

/// Decides from the path and contents whether a provider handles a file.
pub type Predicate = Box<dyn Fn(&Path, &[u8]) -> bool + Send + Sync>;

/// Builds a source from a file the predicate accepted.
pub type Factory = Box<dyn Fn(&Path, Bytes) -> Result<Box<dyn Source>, VfsError> + Send + Sync>;

mod constants {
	/// DAT1 header: directory count plus three reserved words
	pub const DAT1_HEADER_SIZE: usize = 16;

	/// Smallest possible per-directory record in a DAT1 index
	pub const DAT1_DIRECTORY_MIN_SIZE: u64 = 16;

	/// DAT2 trailer: file list length plus archive size
	pub const DAT2_TRAILER_SIZE: usize = 8;
}

/// One registered archive format.
pub struct Provider {
	name: String,
	predicate: Predicate,
	factory: Factory,
}

impl Provider {
	/// Creates a provider.
	pub fn new(
		name: impl Into<String>,
		predicate: impl Fn(&Path, &[u8]) -> bool + Send + Sync + 'static,
		factory: impl Fn(&Path, Bytes) -> Result<Box<dyn Source>, VfsError> + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.into(),
			predicate: Box::new(predicate),
			factory: Box::new(factory),
		}
	}

	/// Provider name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns `true` if this provider recognises the file.
	pub fn accepts(&self, path: &Path, data: &[u8]) -> bool {
		(self.predicate)(path, data)
	}

	/// Builds a source for the file.
	pub fn create(&self, path: &Path, data: Bytes) -> Result<Box<dyn Source>, VfsError> {
		(self.factory)(path, data)
	}
}

impl std::fmt::Debug for Provider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Provider").field("name", &self.name).finish_non_exhaustive()
	}
}

/// Ordered set of archive providers.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
	providers: Vec<Provider>,
}

impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry knowing the DAT2 and DAT1 layouts.
	///
	/// DAT2 is probed first since its trailer check is exact, while the DAT1
	/// check is only a plausibility test on the directory count.
	pub fn fallout(dat2_compression: Dat2Compression) -> Self {
		let mut registry = Self::new();
		registry
			.register(Provider::new("DAT2", is_dat2, move |path, data| {
				archive_source(path, data, ArchiveKind::Dat2(dat2_compression))
			}))
			.register(Provider::new("DAT1", is_dat1, |path, data| {
				archive_source(path, data, ArchiveKind::Dat1)
			}));
		registry
	}

	/// Appends a provider. Earlier providers take precedence.
	pub fn register(&mut self, provider: Provider) -> &mut Self {
		self.providers.push(provider);
		self
	}

	/// Registered providers in probe order.
	pub fn providers(&self) -> &[Provider] {
		&self.providers
	}

	/// Returns the first provider accepting the file.
	pub fn find(&self, path: &Path, data: &[u8]) -> Option<&Provider> {
		self.providers.iter().find(|provider| provider.accepts(path, data))
	}

	/// Detects the format of an in-memory file and builds its source.
	pub fn create(&self, path: &Path, data: Bytes) -> Result<Box<dyn Source>, VfsError> {
		let provider = self.find(path, &data).ok_or_else(|| VfsError::NoProvider(path.to_path_buf()))?;
		debug!("{} detected as {}", path.display(), provider.name());
		provider.create(path, data)
	}

	/// Reads a file from disk and builds its source.
	pub fn open(&self, path: &Path) -> Result<Box<dyn Source>, VfsError> {
		let data = std::fs::read(path).map_err(|error| VfsError::io(path, error))?;
		self.create(path, Bytes::from(data))
	}
}

fn archive_source(path: &Path, data: Bytes, kind: ArchiveKind) -> Result<Box<dyn Source>, VfsError> {
	let source = ArchiveSource::from_bytes(path.display().to_string(), data, kind)?;
	Ok(Box::new(source))
}

fn has_dat_extension(path: &Path) -> bool {
	path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("dat"))
}

/// DAT2 sniffing: the trailer's archive size must equal the file size and
/// the file list must fit in front of it.
pub fn is_dat2(_path: &Path, data: &[u8]) -> bool {
	let Some(trailer_start) = data.len().checked_sub(constants::DAT2_TRAILER_SIZE) else {
		return false;
	};
	let word = |at: usize| u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]) as usize;
	let file_list_length = word(trailer_start);
	let archive_size = word(trailer_start + 4);
	archive_size == data.len() && file_list_length <= trailer_start
}

/// DAT1 sniffing: a `.dat` file whose big-endian directory count is non-zero
/// and leaves room for that many directory records.
pub fn is_dat1(path: &Path, data: &[u8]) -> bool {
	if !has_dat_extension(path) || data.len() < constants::DAT1_HEADER_SIZE {
		return false;
	}
	let directory_count = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
	directory_count > 0 && u64::from(directory_count) * constants::DAT1_DIRECTORY_MIN_SIZE <= data.len() as u64
}
