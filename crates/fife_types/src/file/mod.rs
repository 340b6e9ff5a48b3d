//! File type support for the Fallout asset pipeline.

mod error;

pub mod color_override;
pub mod dat;
pub mod frm;
pub mod lzss;
pub mod pal;
pub mod raw;

/// Size of a palette file in bytes (256 RGB triples)
pub const PALETTE_FILE_SIZE: usize = 768;

// Re-export unified error type
pub use error::{FifeFileError, FileType};

// Re-export main file types
pub use color_override::{ColorOverride, EMPTY_OVERRIDE, OverrideMap};
pub use dat::{
	Archive, ArchiveBuilder, ArchiveEntry, ArchiveIndex, ArchiveKind, Compression as DatCompression,
	Dat2Compression, normalize_path,
};
pub use frm::{
	Animation, Builder as FrmBuilder, DecodedFrame, File as FrmFile, FrameInfo, FrameSpec, FrmContext,
	Header as FrmHeader, Image, ImageData,
};
pub use pal::{
	AnimatedBlock, AnimatedPalette, AnimatedPaletteDefinition, BlockDefinition, BlockUsage, Color,
	ColorResolver, LightLevel, Palette,
};
pub use raw::{Endian, RawData};
