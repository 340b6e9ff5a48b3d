//! Fallout DAT archives.
//!
//! Two container layouts exist:
//!
//! - **DAT1** (Fallout 1): big-endian, index at the start of the file grouped
//!   by directory. Compressed entries use [`lzss`](crate::file::lzss).
//! - **DAT2** (Fallout 2): little-endian, index at the end of the file located
//!   through an 8 byte trailer. The compression scheme differs between game
//!   revisions and is chosen through [`Dat2Compression`].
//!
//! Both parse into an [`ArchiveIndex`] keyed by normalized path (forward
//! slashes, lowercase), which [`Archive`] pairs with the backing bytes.

pub mod builder;
pub mod dat1;
pub mod dat2;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

use bytes::Bytes;
use flate2::read::ZlibDecoder;
use log::{debug, warn};
use serde::Deserialize;

use crate::file::{FifeFileError, FileType, RawData, lzss};

pub use builder::ArchiveBuilder;

/// How an entry is stored in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
	/// Stored verbatim
	None,
	/// Fallout LZSS block stream
	Lzss,
	/// zlib stream
	Zlib,
}

/// Compression scheme flagged by a DAT2 entry's type byte.
///
/// Shipped Fallout 2 archives use zlib with type `1`. Older tooling wrote
/// LZSS entries with type `0x40` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dat2Compression {
	/// Type byte `1` marks a zlib stream
	#[default]
	Zlib,
	/// Type byte `0x40` marks an LZSS stream
	Lzss,
}

impl Dat2Compression {
	/// Type byte marking a compressed entry.
	pub fn type_code(self) -> u8 {
		match self {
			Self::Zlib => constants::DAT2_ZLIB,
			Self::Lzss => constants::LZSS_TYPE as u8,
		}
	}

	/// Entry compression for this scheme.
	pub fn compression(self) -> Compression {
		match self {
			Self::Zlib => Compression::Zlib,
			Self::Lzss => Compression::Lzss,
		}
	}
}

/// Archive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
	/// Fallout 1 layout
	Dat1,
	/// Fallout 2 layout with the given compression scheme
	Dat2(Dat2Compression),
}

impl ArchiveKind {
	/// File type used in errors.
	pub fn file_type(self) -> FileType {
		match self {
			Self::Dat1 => FileType::Dat1,
			Self::Dat2(_) => FileType::Dat2,
		}
	}
}

impl fmt::Display for ArchiveKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Dat1 => write!(f, "DAT1"),
			Self::Dat2(compression) => write!(f, "DAT2 ({compression:?})"),
		}
	}
}

mod constants {
	/// DAT1 and legacy DAT2 type marking an LZSS entry
	pub const LZSS_TYPE: u32 = 0x40;

	/// DAT1 type written for stored entries
	pub const DAT1_STORED: u32 = 0x20;

	/// DAT2 type marking a zlib entry
	pub const DAT2_ZLIB: u8 = 1;

	/// Bytes per DAT1 directory, used as a lower bound on the file size
	pub const DAT1_DIRECTORY_MIN_SIZE: u64 = 16;

	/// Size of the DAT2 trailer
	pub const DAT2_TRAILER_SIZE: usize = 8;
}

/// One file stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
	/// Normalized path
	pub name: String,
	/// Storage method
	pub compression: Compression,
	/// Absolute offset of the stored bytes
	pub offset: u32,
	/// Size after decompression
	pub unpacked_length: u32,
	/// Size of the compressed bytes
	pub packed_length: u32,
}

impl ArchiveEntry {
	/// Creates an entry, normalizing `name`.
	pub fn new(name: &str, compression: Compression, offset: u32, unpacked_length: u32, packed_length: u32) -> Self {
		Self {
			name: normalize_path(name),
			compression,
			offset,
			unpacked_length,
			packed_length,
		}
	}

	/// Returns `true` if the entry must be decompressed.
	pub fn is_compressed(&self) -> bool {
		self.compression != Compression::None
	}

	/// Number of bytes occupied in the archive.
	pub fn stored_length(&self) -> u32 {
		if self.is_compressed() {
			self.packed_length
		} else {
			self.unpacked_length
		}
	}

	/// Checks that the stored bytes lie inside an archive of `archive_size` bytes.
	pub(crate) fn validate_range(&self, archive_size: usize, file_type: FileType) -> Result<(), FifeFileError> {
		let end = u64::from(self.offset) + u64::from(self.stored_length());
		if end > archive_size as u64 {
			return Err(FifeFileError::invalid_format(
				file_type,
				format!(
					"entry '{}' spans {}..{} beyond archive size {}",
					self.name, self.offset, end, archive_size
				),
			));
		}
		Ok(())
	}
}

/// Normalizes an archive path for lookup.
///
/// Backslashes become forward slashes, the result is lowercased and leading
/// `./` or `/` components are dropped together with trailing slashes.
pub fn normalize_path(path: &str) -> String {
	let mut name = path.replace('\\', "/").to_lowercase();
	loop {
		if let Some(rest) = name.strip_prefix("./") {
			name = rest.to_string();
		} else if let Some(rest) = name.strip_prefix('/') {
			name = rest.to_string();
		} else {
			break;
		}
	}
	if name == "." {
		name.clear();
	}
	while name.ends_with('/') {
		name.pop();
	}
	name
}

/// Flat map of normalized paths to entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
	entries: BTreeMap<String, ArchiveEntry>,
}

impl ArchiveIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an entry, replacing any earlier entry with the same path.
	pub fn insert(&mut self, entry: ArchiveEntry) {
		if let Some(previous) = self.entries.insert(entry.name.clone(), entry) {
			debug!("Duplicate archive entry '{}', keeping the last one", previous.name);
		}
	}

	/// Looks up an entry by path in any case or separator style.
	pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
		self.entries.get(&normalize_path(name))
	}

	/// Returns `true` if `name` is in the index.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if the index has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over entries in path order.
	pub fn iter(&self) -> impl Iterator<Item = &ArchiveEntry> {
		self.entries.values()
	}

	/// Names of the files directly inside `path`.
	pub fn list_files(&self, path: &str) -> BTreeSet<String> {
		self.list(path, false)
	}

	/// Names of the directories directly inside `path`.
	///
	/// Only the first component below `path` is reported, so `a/b/c/d.frm`
	/// makes `b` visible from `a` and `c` visible from `a/b`.
	pub fn list_directories(&self, path: &str) -> BTreeSet<String> {
		self.list(path, true)
	}

	fn list(&self, path: &str, directories: bool) -> BTreeSet<String> {
		let mut prefix = normalize_path(path);
		if !prefix.is_empty() {
			prefix.push('/');
		}

		self.entries
			.range(prefix.clone()..)
			.take_while(|(name, _)| name.starts_with(&prefix))
			.filter_map(|(name, _)| {
				let suffix = &name[prefix.len()..];
				match suffix.split_once('/') {
					Some((directory, _)) if directories => Some(directory.to_string()),
					None if !directories => Some(suffix.to_string()),
					_ => None,
				}
			})
			.collect()
	}
}

/// A parsed archive together with its backing bytes.
#[derive(Debug, Clone)]
pub struct Archive {
	kind: ArchiveKind,
	data: Bytes,
	index: ArchiveIndex,
}

impl Archive {
	/// Parses an archive held in memory.
	pub fn from_bytes(data: impl Into<Bytes>, kind: ArchiveKind) -> Result<Self, FifeFileError> {
		let data = data.into();
		let mut raw = RawData::new(data.clone());
		let index = match kind {
			ArchiveKind::Dat1 => dat1::parse_index(&mut raw)?,
			ArchiveKind::Dat2(compression) => dat2::parse_index(&mut raw, compression)?,
		};

		debug!("{kind}: {} entries in {} bytes", index.len(), data.len());

		Ok(Self {
			kind,
			data,
			index,
		})
	}

	/// Reads and parses an archive from disk.
	pub fn load(path: impl AsRef<Path>, kind: ArchiveKind) -> Result<Self, FifeFileError> {
		let path = path.as_ref();
		let data = std::fs::read(path)?;
		debug!("Loading {kind} archive {}", path.display());
		Self::from_bytes(data, kind)
	}

	/// Archive layout.
	pub fn kind(&self) -> ArchiveKind {
		self.kind
	}

	/// Size of the backing data.
	pub fn size(&self) -> usize {
		self.data.len()
	}

	/// The parsed index.
	pub fn index(&self) -> &ArchiveIndex {
		&self.index
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns `true` if the archive has no entries.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Iterates over entries in path order.
	pub fn iter(&self) -> impl Iterator<Item = &ArchiveEntry> {
		self.index.iter()
	}

	/// Looks up an entry.
	pub fn entry(&self, name: &str) -> Option<&ArchiveEntry> {
		self.index.get(name)
	}

	/// Returns `true` if `name` is stored in the archive.
	pub fn file_exists(&self, name: &str) -> bool {
		self.index.contains(name)
	}

	/// Names of the files directly inside `path`.
	pub fn list_files(&self, path: &str) -> BTreeSet<String> {
		self.index.list_files(path)
	}

	/// Names of the directories directly inside `path`.
	pub fn list_directories(&self, path: &str) -> BTreeSet<String> {
		self.index.list_directories(path)
	}

	/// Returns the decoded contents of `name`.
	pub fn open(&self, name: &str) -> Result<Vec<u8>, FifeFileError> {
		let entry = self
			.entry(name)
			.ok_or_else(|| FifeFileError::NotFound(name.to_string()))?;
		self.read_entry(entry)
	}

	/// Returns the decoded contents of an entry of this archive.
	pub fn read_entry(&self, entry: &ArchiveEntry) -> Result<Vec<u8>, FifeFileError> {
		let raw = RawData::new(self.data.clone());
		let stored = raw.slice(entry.offset as usize, entry.stored_length() as usize)?;
		let unpacked_length = entry.unpacked_length as usize;

		match entry.compression {
			Compression::None => Ok(stored.to_vec()),
			Compression::Lzss => lzss::decompress(stored, unpacked_length),
			Compression::Zlib => {
				let decompression_error = |e: std::io::Error| FifeFileError::Decompression {
					file_type: self.kind.file_type(),
					message: format!("'{}': {e}", entry.name),
				};
				let mut decoder = ZlibDecoder::new(&stored[..]);
				let mut out = Vec::with_capacity(unpacked_length);
				(&mut decoder)
					.take(unpacked_length as u64)
					.read_to_end(&mut out)
					.map_err(decompression_error)?;

				if out.len() < unpacked_length {
					warn!(
						"{}: '{}' inflated to {} bytes, index says {}",
						self.kind,
						entry.name,
						out.len(),
						unpacked_length
					);
					out.resize(unpacked_length, 0);
				} else if decoder.read(&mut [0u8; 1]).map_err(decompression_error)? != 0 {
					warn!(
						"{}: '{}' inflates past the {} bytes the index declares",
						self.kind, entry.name, unpacked_length
					);
				}
				Ok(out)
			}
		}
	}
}
