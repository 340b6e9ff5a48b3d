//! Prelude module for `fife_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use fife_types::prelude::*;
//!
//! let palette = Palette::open("color.pal")?;
//! let animated = AnimatedPalette::fallout(palette);
//! # Ok::<(), FifeFileError>(())
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Constants
	PALETTE_FILE_SIZE,

	// Archive types
	Archive,
	ArchiveBuilder,
	ArchiveEntry,
	ArchiveIndex,
	ArchiveKind,
	DatCompression,
	Dat2Compression,

	// Errors
	FifeFileError,
	FileType,

	// FRM types
	Animation,
	DecodedFrame,
	FrameInfo,
	FrameSpec,
	FrmBuilder,
	FrmContext,
	FrmFile,
	FrmHeader,
	Image,
	ImageData,

	// Palette types
	AnimatedBlock,
	AnimatedPalette,
	BlockUsage,
	Color,
	ColorResolver,
	LightLevel,
	Palette,

	// Color overrides
	ColorOverride,
	OverrideMap,

	// Raw data
	Endian,
	RawData,
};

#[doc(inline)]
pub use crate::file::lzss;

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
