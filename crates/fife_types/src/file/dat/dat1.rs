//! Fallout 1 archive index.
//!
//! ## Layout (all integers big-endian)
//!
//! | Field                     | Size                  |
//! |---------------------------|-----------------------|
//! | directory count           | u32                   |
//! | reserved                  | 3 × u32               |
//! | directory names           | (u8 length + bytes) × directory count |
//!
//! followed, for every directory in order, by
//!
//! | Field        | Size     |
//! |--------------|----------|
//! | file count   | u32      |
//! | reserved     | 3 × u32  |
//! | files        | see below × file count |
//!
//! and each file is a `u8` length prefixed name, then type, offset, unpacked
//! length and packed length as `u32`. Type `0x40` marks an LZSS entry.

use log::debug;

use super::{ArchiveEntry, ArchiveIndex, Compression, constants};
use crate::file::{FifeFileError, FileType, RawData};

/// DAT1 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
	/// Number of directories
	pub directory_count: u32,
	/// Unused fields
	pub reserved: [u32; 3],
}

impl Header {
	/// Size of the header in bytes.
	pub const SIZE: usize = 16;

	/// Reads the header at the cursor position.
	pub fn from_raw(raw: &mut RawData) -> Result<Self, FifeFileError> {
		if raw.remaining() < Self::SIZE {
			return Err(FifeFileError::insufficient_data(FileType::Dat1, Self::SIZE, raw.remaining()));
		}

		let directory_count = raw.read32_big()?;
		let reserved = [raw.read32_big()?, raw.read32_big()?, raw.read32_big()?];

		Ok(Self {
			directory_count,
			reserved,
		})
	}
}

/// Joins a directory and file name. The `.` directory is the archive root.
fn join_path(directory: &str, file: &str) -> String {
	if directory.is_empty() || directory == "." {
		file.to_string()
	} else {
		format!("{directory}/{file}")
	}
}

fn read_name(raw: &mut RawData) -> Result<String, FifeFileError> {
	let length = raw.read8()?;
	raw.read_string(usize::from(length))
}

/// Parses the index of a DAT1 archive.
pub fn parse_index(raw: &mut RawData) -> Result<ArchiveIndex, FifeFileError> {
	raw.set_index(0)?;
	let header = Header::from_raw(raw)?;

	if u64::from(header.directory_count) * constants::DAT1_DIRECTORY_MIN_SIZE > raw.len() as u64 {
		return Err(FifeFileError::invalid_format(
			FileType::Dat1,
			format!(
				"{} directories cannot fit in {} bytes",
				header.directory_count,
				raw.len()
			),
		));
	}

	let mut directories = Vec::with_capacity(header.directory_count as usize);
	for _ in 0..header.directory_count {
		directories.push(read_name(raw)?);
	}

	let mut index = ArchiveIndex::new();
	for directory in &directories {
		let file_count = raw.read32_big()?;
		raw.move_index(12)?;
		debug!("DAT1: directory '{directory}' holds {file_count} files");

		for _ in 0..file_count {
			let name = read_name(raw)?;
			let kind = raw.read32_big()?;
			let offset = raw.read32_big()?;
			let unpacked_length = raw.read32_big()?;
			let packed_length = raw.read32_big()?;

			let compression = if kind == constants::LZSS_TYPE {
				Compression::Lzss
			} else {
				Compression::None
			};

			let entry = ArchiveEntry::new(
				&join_path(directory, &name),
				compression,
				offset,
				unpacked_length,
				packed_length,
			);
			entry.validate_range(raw.len(), FileType::Dat1)?;
			index.insert(entry);
		}
	}

	Ok(index)
}
