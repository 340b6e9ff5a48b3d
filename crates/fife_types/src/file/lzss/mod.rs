//! LZSS variant used by Fallout archives.
//!
//! ## Stream Layout
//!
//! A compressed entry is a sequence of blocks. Every block starts with a
//! big-endian `u16` descriptor:
//!
//! | Bit 15 | Bits 0-14 | Meaning                                             |
//! |--------|-----------|-----------------------------------------------------|
//! | 1      | `n`       | `n` literal bytes follow and are copied verbatim    |
//! | 0      | `n`       | `n` encoded bytes follow and are window-decoded     |
//!
//! ## Window Decoding
//!
//! Each encoded block is an independent LZSS stream with a 4096 byte ring
//! buffer whose write index starts at `4096 - 18`. A flag byte precedes every
//! group of eight symbols, consumed LSB first: a set bit is a literal byte, a
//! clear bit a two byte back-reference `(i, j)` with
//!
//! - ring position `i | ((j & 0xF0) << 4)`
//! - copy length `(j & 0x0F) + 2 + 1`
//!
//! No physical ring buffer is kept. A ring position is mapped back onto the
//! output already produced; positions that fall before the start of the
//! output read as `0x20`, the ring buffer's initial fill.
//!
//! ## Truncation
//!
//! A block claiming more input than remains, or a symbol that would write past
//! the expected output size, stops decoding with a warning. The caller gets
//! the number of bytes actually produced.

mod decode;
mod encode;

pub use decode::{decode, decompress};
pub use encode::encode;

/// Size of the virtual ring buffer.
pub const RING_BUFFER_SIZE: usize = 4096;

/// Upper bound for the length of a back-reference.
pub const MATCH_LENGTH_UPPER_BOUND: usize = 18;

/// Minimum match length minus one.
pub const THRESHOLD: usize = 2;

/// Initial ring buffer write index of every encoded block.
pub const RING_BASE: usize = RING_BUFFER_SIZE - MATCH_LENGTH_UPPER_BOUND;

mod constants {
	/// Mask for ring buffer positions.
	pub const RING_MASK: usize = super::RING_BUFFER_SIZE - 1;

	/// Descriptor bit marking a literal run.
	pub const LITERAL_RUN: u16 = 0x8000;

	/// Descriptor bits holding the block length.
	pub const LENGTH_MASK: u16 = 0x7FFF;

	/// Byte the ring buffer is conceptually filled with.
	pub const SPACE: u8 = 0x20;
}
