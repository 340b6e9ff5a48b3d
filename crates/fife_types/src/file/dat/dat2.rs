//! Fallout 2 archive index.
//!
//! The index lives at the end of the file. The last 8 bytes hold the index
//! length and the total archive size; the index itself is a file count
//! followed by one record per file (all integers little-endian):
//!
//! | Field           | Size        |
//! |-----------------|-------------|
//! | name length     | u32         |
//! | name            | bytes       |
//! | type            | u8          |
//! | unpacked length | u32         |
//! | packed length   | u32         |
//! | offset          | u32         |

use log::debug;

use super::{ArchiveEntry, ArchiveIndex, Compression, Dat2Compression, constants};
use crate::file::{FifeFileError, FileType, RawData};

/// Smallest possible file record.
const MIN_RECORD_SIZE: usize = 17;

/// DAT2 trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
	/// Size of the index block, file count included
	pub file_list_length: u32,
	/// Size of the whole archive
	pub archive_size: u32,
}

impl Trailer {
	/// Reads the trailer from the last 8 bytes.
	pub fn from_raw(raw: &mut RawData) -> Result<Self, FifeFileError> {
		if raw.len() < constants::DAT2_TRAILER_SIZE {
			return Err(FifeFileError::insufficient_data(
				FileType::Dat2,
				constants::DAT2_TRAILER_SIZE,
				raw.len(),
			));
		}

		raw.set_index(raw.len() - constants::DAT2_TRAILER_SIZE)?;
		let file_list_length = raw.read32_little()?;
		let archive_size = raw.read32_little()?;

		Ok(Self {
			file_list_length,
			archive_size,
		})
	}

	/// Offset of the file count that starts the index.
	pub fn index_offset(&self) -> Option<usize> {
		let index_end = (self.archive_size as usize).checked_sub(constants::DAT2_TRAILER_SIZE)?;
		index_end.checked_sub(self.file_list_length as usize)
	}
}

/// Parses the index of a DAT2 archive.
///
/// Entries whose type byte matches `compression` are compressed with that
/// scheme; any other type is stored.
pub fn parse_index(raw: &mut RawData, compression: Dat2Compression) -> Result<ArchiveIndex, FifeFileError> {
	let trailer = Trailer::from_raw(raw)?;
	debug!(
		"DAT2: file list length {} archive size {}",
		trailer.file_list_length, trailer.archive_size
	);

	if trailer.archive_size as usize != raw.len() {
		return Err(FifeFileError::invalid_format(
			FileType::Dat2,
			format!("size mismatch: trailer says {} bytes, file has {}", trailer.archive_size, raw.len()),
		));
	}

	let index_offset = trailer.index_offset().ok_or_else(|| {
		FifeFileError::invalid_format(
			FileType::Dat2,
			format!("file list length {} exceeds archive size", trailer.file_list_length),
		)
	})?;

	raw.set_index(index_offset)?;
	let file_count = raw.read32_little()?;
	debug!("DAT2: {file_count} files");

	let mut index = ArchiveIndex::new();
	for _ in 0..file_count {
		if raw.remaining() < MIN_RECORD_SIZE {
			return Err(FifeFileError::insufficient_data(FileType::Dat2, MIN_RECORD_SIZE, raw.remaining()));
		}

		let name_length = raw.read32_little()?;
		let name = raw.read_string(name_length as usize)?;
		let kind = raw.read8()?;
		let unpacked_length = raw.read32_little()?;
		let packed_length = raw.read32_little()?;
		let offset = raw.read32_little()?;

		let entry_compression = if kind == compression.type_code() {
			compression.compression()
		} else {
			Compression::None
		};

		let entry = ArchiveEntry::new(&name, entry_compression, offset, unpacked_length, packed_length);
		entry.validate_range(raw.len(), FileType::Dat2)?;
		index.insert(entry);
	}

	Ok(index)
}
