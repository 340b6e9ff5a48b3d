//! LZSS decompression.

use log::warn;

use super::{RING_BASE, THRESHOLD, constants};
use crate::file::{FifeFileError, RawData};

/// Decoder state shared by every block of one entry.
struct Decoder<'a> {
	output: &'a mut [u8],
	out_index: usize,
}

impl Decoder<'_> {
	/// Writes one byte, refusing to grow past the pre-sized output.
	#[inline]
	fn write(&mut self, byte: u8) -> bool {
		if self.out_index >= self.output.len() {
			warn!("LZSS: output overflow at {} bytes, stopping decode", self.output.len());
			return false;
		}
		self.output[self.out_index] = byte;
		self.out_index += 1;
		true
	}

	/// Copies a literal run straight from the input.
	fn literal_run(&mut self, input: &mut RawData, length: usize) -> Result<bool, FifeFileError> {
		let end = self.out_index + length;
		if end > self.output.len() {
			warn!(
				"LZSS: literal run of {} bytes exceeds output ({} of {} written), stopping decode",
				length,
				self.out_index,
				self.output.len()
			);
			return Ok(false);
		}
		input.read_into(&mut self.output[self.out_index..end])?;
		self.out_index = end;
		Ok(true)
	}

	/// Window-decodes one encoded block.
	///
	/// Returns `false` if the output overflowed.
	fn decode_block(&mut self, input: &[u8]) -> bool {
		let mut rb_index = RING_BASE;
		let mut read = 0;
		let mut flags: u32 = 0;

		loop {
			flags >>= 1;
			if flags & 0x100 == 0 {
				let Some(&flag_byte) = input.get(read) else {
					break;
				};
				read += 1;
				// the high byte counts down the eight symbols of this group
				flags = u32::from(flag_byte) | 0xFF00;
			}

			if flags & 1 != 0 {
				let Some(&byte) = input.get(read) else {
					break;
				};
				read += 1;
				if !self.write(byte) {
					return false;
				}
				rb_index = (rb_index + 1) & constants::RING_MASK;
			} else {
				let (Some(&i), Some(&j)) = (input.get(read), input.get(read + 1)) else {
					break;
				};
				read += 2;

				let position = usize::from(i) | ((usize::from(j) & 0xF0) << 4);
				let length = (usize::from(j) & 0x0F) + THRESHOLD;

				let distance = (rb_index + constants::RING_MASK + 1 - position) & constants::RING_MASK;
				let base_index = self.out_index as isize - distance as isize;

				for k in 0..=length {
					if self.out_index >= self.output.len() {
						warn!(
							"LZSS: back-reference overflows output of {} bytes, stopping decode",
							self.output.len()
						);
						return false;
					}
					let source = base_index + k as isize;
					let byte = if source < 0 {
						constants::SPACE
					} else {
						self.output[source as usize]
					};
					self.output[self.out_index] = byte;
					self.out_index += 1;
					rb_index = (rb_index + 1) & constants::RING_MASK;
				}
			}
		}

		true
	}
}

/// Decodes an LZSS stream from `input` into the pre-sized `output`.
///
/// Returns the number of bytes written. A value smaller than `output.len()`
/// means the stream was truncated or malformed; the error path is reserved for
/// a block descriptor that cannot be read at all.
pub fn decode(input: &mut RawData, output: &mut [u8]) -> Result<usize, FifeFileError> {
	let mut decoder = Decoder {
		output,
		out_index: 0,
	};

	while decoder.out_index < decoder.output.len() {
		let descriptor = input.read16_big()?;
		let length = usize::from(descriptor & constants::LENGTH_MASK);

		if length > input.remaining() {
			warn!(
				"LZSS: block at {} declares {} bytes but only {} remain, stopping decode",
				input.index() - 2,
				length,
				input.remaining()
			);
			break;
		}

		if descriptor & constants::LITERAL_RUN != 0 {
			if !decoder.literal_run(input, length)? {
				break;
			}
		} else {
			let block = input.read_bytes(length)?;
			if !decoder.decode_block(&block) {
				break;
			}
		}
	}

	Ok(decoder.out_index)
}

/// Decodes a complete compressed entry into a buffer of `unpacked_length` bytes.
///
/// A truncated stream leaves the tail of the buffer zeroed.
pub fn decompress(packed: impl Into<RawData>, unpacked_length: usize) -> Result<Vec<u8>, FifeFileError> {
	let mut input = packed.into();
	let mut output = vec![0u8; unpacked_length];
	let written = decode(&mut input, &mut output)?;
	if written < unpacked_length {
		warn!("LZSS: short decode, {written} of {unpacked_length} bytes produced");
	}
	Ok(output)
}
