//! LZSS compression.
//!
//! Produces streams the decoder in this module reads back. Input is split into
//! independent chunks; a chunk that does not shrink is stored as a literal run.

use std::collections::HashMap;

use super::{MATCH_LENGTH_UPPER_BOUND, RING_BASE, THRESHOLD, constants};

/// Bytes of input covered by one block.
const CHUNK_SIZE: usize = 4096;

/// Candidates inspected per position when searching for a match.
const MAX_CHAIN: usize = 64;

/// Shortest back-reference worth encoding.
const MIN_MATCH: usize = THRESHOLD + 1;

/// Accumulates symbols behind their group flag byte.
struct BlockWriter {
	out: Vec<u8>,
	flag_position: usize,
	flag_bit: u8,
}

impl BlockWriter {
	fn new(capacity: usize) -> Self {
		Self {
			out: Vec::with_capacity(capacity),
			flag_position: 0,
			flag_bit: 8,
		}
	}

	fn begin_symbol(&mut self) {
		if self.flag_bit == 8 {
			self.flag_position = self.out.len();
			self.out.push(0);
			self.flag_bit = 0;
		}
	}

	fn literal(&mut self, byte: u8) {
		self.begin_symbol();
		self.out[self.flag_position] |= 1 << self.flag_bit;
		self.flag_bit += 1;
		self.out.push(byte);
	}

	fn reference(&mut self, ring_position: usize, length: usize) {
		self.begin_symbol();
		self.flag_bit += 1;
		self.out.push((ring_position & 0xFF) as u8);
		self.out.push((((ring_position >> 4) & 0xF0) | (length - MIN_MATCH)) as u8);
	}
}

/// Finds the longest earlier match for `chunk[position..]`.
fn longest_match(chunk: &[u8], position: usize, candidates: Option<&Vec<usize>>) -> Option<(usize, usize)> {
	let candidates = candidates?;
	let limit = (chunk.len() - position).min(MATCH_LENGTH_UPPER_BOUND);
	let mut best: Option<(usize, usize)> = None;

	for &start in candidates.iter().rev().take(MAX_CHAIN) {
		let length = (0..limit)
			.take_while(|&k| chunk[start + k] == chunk[position + k])
			.count();
		if length >= MIN_MATCH && best.is_none_or(|(_, best_length)| length > best_length) {
			best = Some((start, length));
			if length == limit {
				break;
			}
		}
	}

	best
}

/// Records `chunk[at..at + 3]` as a match candidate.
fn insert(chains: &mut HashMap<[u8; 3], Vec<usize>>, chunk: &[u8], at: usize) {
	if at + MIN_MATCH <= chunk.len() {
		chains
			.entry([chunk[at], chunk[at + 1], chunk[at + 2]])
			.or_default()
			.push(at);
	}
}

/// Window-encodes one chunk. Matches never reach outside the chunk.
fn encode_block(chunk: &[u8]) -> Vec<u8> {
	let mut writer = BlockWriter::new(chunk.len() + chunk.len() / 8 + 1);
	let mut chains: HashMap<[u8; 3], Vec<usize>> = HashMap::new();

	let mut position = 0;
	while position < chunk.len() {
		let found = if position + MIN_MATCH <= chunk.len() {
			let key = [chunk[position], chunk[position + 1], chunk[position + 2]];
			longest_match(chunk, position, chains.get(&key))
		} else {
			None
		};

		match found {
			Some((start, length)) => {
				writer.reference((RING_BASE + start) & constants::RING_MASK, length);
				for at in position..position + length {
					insert(&mut chains, chunk, at);
				}
				position += length;
			}
			None => {
				writer.literal(chunk[position]);
				insert(&mut chains, chunk, position);
				position += 1;
			}
		}
	}

	writer.out
}

/// Compresses `data` into a stream of descriptor-prefixed blocks.
pub fn encode(data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(data.len() / 2 + 16);

	for chunk in data.chunks(CHUNK_SIZE) {
		let encoded = encode_block(chunk);
		if encoded.len() < chunk.len() {
			out.extend_from_slice(&(encoded.len() as u16).to_be_bytes());
			out.extend_from_slice(&encoded);
		} else {
			out.extend_from_slice(&(constants::LITERAL_RUN | chunk.len() as u16).to_be_bytes());
			out.extend_from_slice(chunk);
		}
	}

	out
}
