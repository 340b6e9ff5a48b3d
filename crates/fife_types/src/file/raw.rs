//! Bounds-checked sequential reader over an in-memory byte buffer.
//!
//! Every format in this crate is parsed through [`RawData`]. Reads advance an
//! internal cursor and fail with [`FifeFileError::IndexOverflow`] instead of
//! panicking when the data ends early.

use bytes::Bytes;
use encoding_rs::WINDOWS_1252;

use super::FifeFileError;

/// Byte order of a multi-byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
	/// Most significant byte first (DAT1, FRM, LZSS block descriptors)
	Big,
	/// Least significant byte first (DAT2)
	Little,
}

/// Byte buffer with a read cursor.
///
/// Cloning is cheap: the underlying storage is reference counted and only the
/// cursor is copied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawData {
	data: Bytes,
	index: usize,
}

impl RawData {
	/// Wraps a byte buffer, placing the cursor at the start.
	pub fn new(data: impl Into<Bytes>) -> Self {
		Self {
			data: data.into(),
			index: 0,
		}
	}

	/// Total length of the data in bytes.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the buffer holds no bytes.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Current cursor position.
	#[inline]
	pub fn index(&self) -> usize {
		self.index
	}

	/// Number of bytes between the cursor and the end of the data.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.index
	}

	/// Returns the whole underlying buffer, independent of the cursor.
	pub fn as_bytes(&self) -> &Bytes {
		&self.data
	}

	/// Moves the cursor to an absolute position in `[0, len]`.
	pub fn set_index(&mut self, position: usize) -> Result<(), FifeFileError> {
		if position > self.data.len() {
			return Err(FifeFileError::index_overflow(position, self.data.len()));
		}
		self.index = position;
		Ok(())
	}

	/// Moves the cursor relative to its current position.
	pub fn move_index(&mut self, delta: i64) -> Result<(), FifeFileError> {
		let target = self.index as i64 + delta;
		if target < 0 {
			return Err(FifeFileError::index_overflow(0, self.data.len()));
		}
		self.set_index(target as usize)
	}

	fn take(&mut self, width: usize) -> Result<&[u8], FifeFileError> {
		let end = self.index.checked_add(width).unwrap_or(usize::MAX);
		if end > self.data.len() {
			return Err(FifeFileError::index_overflow(end, self.data.len()));
		}
		let start = self.index;
		self.index = end;
		Ok(&self.data[start..end])
	}

	/// Reads a single byte.
	pub fn read8(&mut self) -> Result<u8, FifeFileError> {
		Ok(self.take(1)?[0])
	}

	/// Reads an unsigned 16-bit integer.
	pub fn read16(&mut self, endian: Endian) -> Result<u16, FifeFileError> {
		let slice = self.take(2)?;
		let bytes = [slice[0], slice[1]];
		Ok(match endian {
			Endian::Big => u16::from_be_bytes(bytes),
			Endian::Little => u16::from_le_bytes(bytes),
		})
	}

	/// Reads an unsigned 32-bit integer.
	pub fn read32(&mut self, endian: Endian) -> Result<u32, FifeFileError> {
		let slice = self.take(4)?;
		let bytes = [slice[0], slice[1], slice[2], slice[3]];
		Ok(match endian {
			Endian::Big => u32::from_be_bytes(bytes),
			Endian::Little => u32::from_le_bytes(bytes),
		})
	}

	/// Reads a big-endian `u16`.
	#[inline]
	pub fn read16_big(&mut self) -> Result<u16, FifeFileError> {
		self.read16(Endian::Big)
	}

	/// Reads a little-endian `u16`.
	#[inline]
	pub fn read16_little(&mut self) -> Result<u16, FifeFileError> {
		self.read16(Endian::Little)
	}

	/// Reads a big-endian `u32`.
	#[inline]
	pub fn read32_big(&mut self) -> Result<u32, FifeFileError> {
		self.read32(Endian::Big)
	}

	/// Reads a little-endian `u32`.
	#[inline]
	pub fn read32_little(&mut self) -> Result<u32, FifeFileError> {
		self.read32(Endian::Little)
	}

	/// Reads a big-endian two's complement `i16`.
	#[inline]
	pub fn read_i16_big(&mut self) -> Result<i16, FifeFileError> {
		Ok(self.read16_big()? as i16)
	}

	/// Fills `buffer` completely from the cursor position.
	pub fn read_into(&mut self, buffer: &mut [u8]) -> Result<(), FifeFileError> {
		let slice = self.take(buffer.len())?;
		buffer.copy_from_slice(slice);
		Ok(())
	}

	/// Reads `length` bytes into a freshly allocated vector.
	pub fn read_vec(&mut self, length: usize) -> Result<Vec<u8>, FifeFileError> {
		Ok(self.take(length)?.to_vec())
	}

	/// Reads `length` bytes without copying.
	pub fn read_bytes(&mut self, length: usize) -> Result<Bytes, FifeFileError> {
		let start = self.index;
		self.take(length)?;
		Ok(self.data.slice(start..start + length))
	}

	/// Reads a fixed-length string. No terminator is assumed; the bytes are
	/// decoded as Windows-1252, the code page of the original archives.
	pub fn read_string(&mut self, length: usize) -> Result<String, FifeFileError> {
		let slice = self.take(length)?;
		let (text, _, _) = WINDOWS_1252.decode(slice);
		Ok(text.into_owned())
	}

	/// Returns `length` bytes at an absolute position without touching the cursor.
	pub fn slice(&self, position: usize, length: usize) -> Result<Bytes, FifeFileError> {
		let end = position.checked_add(length).unwrap_or(usize::MAX);
		if end > self.data.len() {
			return Err(FifeFileError::index_overflow(end, self.data.len()));
		}
		Ok(self.data.slice(position..end))
	}
}

impl From<Vec<u8>> for RawData {
	fn from(value: Vec<u8>) -> Self {
		Self::new(value)
	}
}

impl From<Bytes> for RawData {
	fn from(value: Bytes) -> Self {
		Self::new(value)
	}
}

impl From<&'static [u8]> for RawData {
	fn from(value: &'static [u8]) -> Self {
		Self::new(Bytes::from_static(value))
	}
}
