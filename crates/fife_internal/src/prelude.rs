//! Prelude module for `fife_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```no_run
//! use fife_internal::prelude::*;
//!
//! let settings = Settings::load(Some("fife.toml".as_ref()))?;
//! let pipeline = AssetPipeline::from_settings(settings)?;
//!
//! let sprite = pipeline.load_frm("art/critters/hmjmpsaa.frm")?;
//! for direction in 0..sprite.num_directions() {
//! 	let frame = sprite.frame(direction, 0)?;
//! 	println!("direction {direction}: animated = {}", frame.is_animated());
//! }
//! # Ok::<(), PipelineError>(())
//! ```

// Re-export everything from fife_types::prelude
#[doc(inline)]
pub use fife_types::prelude::*;

// Virtual file system
#[doc(inline)]
pub use fife_vfs::{ArchiveSource, DirectorySource, ProviderRegistry, Source, Vfs, VfsError};

// Pipeline
#[doc(inline)]
pub use crate::{AssetPipeline, PipelineError, Settings};

// Re-export the lower level crates for advanced usage
#[doc(inline)]
pub use fife_types;
#[doc(inline)]
pub use fife_vfs;
