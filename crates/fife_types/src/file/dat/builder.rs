//! Archive construction.
//!
//! Collects files in memory and serializes them into either DAT layout. Used
//! to fabricate archives for tests and benchmarks and to repack extracted
//! assets.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;

use super::{ArchiveKind, Dat2Compression, constants};
use crate::file::{FifeFileError, FileType, lzss};

#[derive(Debug, Clone)]
struct PendingFile {
	path: String,
	data: Vec<u8>,
	compress: bool,
}

/// A file after compression, ready to be written.
struct StoredFile<'a> {
	name: &'a str,
	stored: Vec<u8>,
	unpacked_length: u32,
	compressed: bool,
}

/// In-memory archive writer.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
	files: Vec<PendingFile>,
}

impl ArchiveBuilder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a file stored verbatim. `/` and `\` are both accepted as separators.
	pub fn add_file(&mut self, path: &str, data: impl Into<Vec<u8>>) -> &mut Self {
		self.push(path, data.into(), false)
	}

	/// Adds a file compressed with the archive's scheme.
	pub fn add_compressed_file(&mut self, path: &str, data: impl Into<Vec<u8>>) -> &mut Self {
		self.push(path, data.into(), true)
	}

	fn push(&mut self, path: &str, data: Vec<u8>, compress: bool) -> &mut Self {
		self.files.push(PendingFile {
			path: path.replace('/', "\\"),
			data,
			compress,
		});
		self
	}

	/// Number of files added so far.
	pub fn len(&self) -> usize {
		self.files.len()
	}

	/// Returns `true` if no file was added.
	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// Serializes the archive.
	pub fn build(&self, kind: ArchiveKind) -> Result<Vec<u8>, FifeFileError> {
		match kind {
			ArchiveKind::Dat1 => self.build_dat1(),
			ArchiveKind::Dat2(compression) => self.build_dat2(compression),
		}
	}

	fn build_dat1(&self) -> Result<Vec<u8>, FifeFileError> {
		let mut directories: BTreeMap<&str, Vec<StoredFile<'_>>> = BTreeMap::new();
		for file in &self.files {
			let (directory, name) = file.path.rsplit_once('\\').unwrap_or((".", file.path.as_str()));
			check_name_length(directory)?;
			check_name_length(name)?;

			let stored = if file.compress {
				lzss::encode(&file.data)
			} else {
				file.data.clone()
			};
			directories.entry(directory).or_default().push(StoredFile {
				name,
				stored,
				unpacked_length: file.data.len() as u32,
				compressed: file.compress,
			});
		}

		let mut index_size = 16 + directories.keys().map(|d| 1 + d.len()).sum::<usize>();
		for files in directories.values() {
			index_size += 16 + files.iter().map(|f| 1 + f.name.len() + 16).sum::<usize>();
		}

		let mut out = Vec::with_capacity(index_size);
		out.extend_from_slice(&(directories.len() as u32).to_be_bytes());
		out.extend_from_slice(&[0u8; 12]);
		for directory in directories.keys() {
			out.push(directory.len() as u8);
			out.extend_from_slice(directory.as_bytes());
		}

		let mut data = Vec::new();
		for files in directories.values() {
			out.extend_from_slice(&(files.len() as u32).to_be_bytes());
			out.extend_from_slice(&[0u8; 12]);
			for file in files {
				let (kind, packed_length) = if file.compressed {
					(constants::LZSS_TYPE, file.stored.len() as u32)
				} else {
					(constants::DAT1_STORED, 0)
				};
				out.push(file.name.len() as u8);
				out.extend_from_slice(file.name.as_bytes());
				out.extend_from_slice(&kind.to_be_bytes());
				out.extend_from_slice(&((index_size + data.len()) as u32).to_be_bytes());
				out.extend_from_slice(&file.unpacked_length.to_be_bytes());
				out.extend_from_slice(&packed_length.to_be_bytes());
				data.extend_from_slice(&file.stored);
			}
		}

		out.extend_from_slice(&data);
		Ok(out)
	}

	fn build_dat2(&self, compression: Dat2Compression) -> Result<Vec<u8>, FifeFileError> {
		let mut out = Vec::new();
		let mut index = Vec::new();
		index.extend_from_slice(&(self.files.len() as u32).to_le_bytes());

		for file in &self.files {
			let (kind, stored) = if file.compress {
				let stored = match compression {
					Dat2Compression::Zlib => {
						let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
						encoder.write_all(&file.data)?;
						encoder.finish()?
					}
					Dat2Compression::Lzss => lzss::encode(&file.data),
				};
				(compression.type_code(), stored)
			} else {
				(0, file.data.clone())
			};

			index.extend_from_slice(&(file.path.len() as u32).to_le_bytes());
			index.extend_from_slice(file.path.as_bytes());
			index.push(kind);
			index.extend_from_slice(&(file.data.len() as u32).to_le_bytes());
			index.extend_from_slice(&(stored.len() as u32).to_le_bytes());
			index.extend_from_slice(&(out.len() as u32).to_le_bytes());
			out.extend_from_slice(&stored);
		}

		let file_list_length = index.len() as u32;
		out.extend_from_slice(&index);
		let archive_size = (out.len() + constants::DAT2_TRAILER_SIZE) as u32;
		out.extend_from_slice(&file_list_length.to_le_bytes());
		out.extend_from_slice(&archive_size.to_le_bytes());
		Ok(out)
	}
}

fn check_name_length(name: &str) -> Result<(), FifeFileError> {
	if name.len() > usize::from(u8::MAX) {
		return Err(FifeFileError::invalid_format(
			FileType::Dat1,
			format!("name '{name}' longer than 255 bytes"),
		));
	}
	Ok(())
}
