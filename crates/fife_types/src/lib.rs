//! This crate provides the file formats of the Fallout asset pipeline.
//!
//! # File Formats
//!
//! - **DAT1/DAT2**: Fallout 1 and Fallout 2 archives, with LZSS or zlib compressed entries
//! - **LZSS**: The block framed LZSS variant used by the archives
//! - **PAL**: 256 color palettes, plus animated palette blocks for color cycling
//! - **FRM**: Indexed color sprites with six directions and lazily decoded frames
//! - **Color overrides**: Per-sprite palette replacements declared in YAML
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fife_types::prelude::*;
//!
//! let archive = Archive::load("master.dat", ArchiveKind::Dat2(Dat2Compression::Zlib))?;
//! let palette = Palette::from_bytes(&archive.open("color.pal")?)?;
//! let context = FrmContext::new(Arc::new(AnimatedPalette::fallout(palette)));
//!
//! let sprite = FrmFile::from_bytes(archive.open("art/critters/hmjmpsaa.frm")?, context)?;
//! let frame = sprite.frame(0, 0)?;
//! # Ok::<(), FifeFileError>(())
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use fife_types::file::{lzss, RawData};
//!
//! let mut input = RawData::new(vec![0x80, 0x02, b'o', b'k']);
//! let mut output = [0u8; 2];
//! let written = lzss::decode(&mut input, &mut output)?;
//! # Ok::<(), fife_types::file::FifeFileError>(())
//! ```

pub mod file;

/// `use fife_types::prelude::*;` to import commonly used items.
pub mod prelude;
