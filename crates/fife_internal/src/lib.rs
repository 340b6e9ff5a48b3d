//! This module is separated into its own crate to enable simple dynamic linking for `fife-fallout`, and should not be used directly.

mod error;
mod pipeline;
mod settings;

/// `use fife_fallout::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the lower level crates for convenience
pub use fife_types;
pub use fife_vfs;

pub use error::PipelineError;
pub use pipeline::AssetPipeline;
pub use settings::Settings;
