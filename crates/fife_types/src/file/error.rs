//! Error types for file format parsing.

use std::fmt;

use thiserror::Error;

/// Identifies which format a [`FifeFileError`] originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Fallout 1 archive
	Dat1,
	/// Fallout 2 archive
	Dat2,
	/// 256 colour palette
	Pal,
	/// Animated palette block definitions
	AnimatedPal,
	/// FRM sprite
	Frm,
	/// Colour override table
	ColorOverride,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FileType::Dat1 => "DAT1",
			FileType::Dat2 => "DAT2",
			FileType::Pal => "PAL",
			FileType::AnimatedPal => "ANIMATED PAL",
			FileType::Frm => "FRM",
			FileType::ColorOverride => "COLOR OVERRIDE",
		};
		f.write_str(name)
	}
}

/// Unified error type for every format in this crate.
#[derive(Debug, Error)]
pub enum FifeFileError {
	/// A structural invariant of the format does not hold
	#[error("{file_type}: invalid format: {message}")]
	InvalidFormat {
		/// Format being parsed
		file_type: FileType,
		/// What went wrong
		message: String,
	},

	/// Requested entry does not exist
	#[error("not found: {0}")]
	NotFound(String),

	/// Cursor or table index out of bounds
	#[error("index overflow: position {position} exceeds length {length}")]
	IndexOverflow {
		/// Position that was requested
		position: usize,
		/// Length of the underlying data
		length: usize,
	},

	/// Not enough data to parse
	#[error("{file_type}: insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Decompression of an entry failed
	#[error("{file_type}: decompression failed: {message}")]
	Decompression {
		/// Format being decompressed
		file_type: FileType,
		/// Decoder message
		message: String,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Declarative data file could not be parsed
	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),
}

impl FifeFileError {
	/// Creates an [`FifeFileError::InvalidFormat`] error.
	pub fn invalid_format(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InvalidFormat {
			file_type,
			message: message.into(),
		}
	}

	/// Creates an [`FifeFileError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`FifeFileError::IndexOverflow`] error.
	pub fn index_overflow(position: usize, length: usize) -> Self {
		Self::IndexOverflow {
			position,
			length,
		}
	}

	/// Returns `true` for [`FifeFileError::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_))
	}
}
