//! Error type for the asset pipeline.

use fife_types::file::FifeFileError;
use fife_vfs::VfsError;
use thiserror::Error;

/// Errors raised while configuring the pipeline or loading an asset.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// Settings could not be read
	#[error("configuration error: {0}")]
	Config(#[from] config::ConfigError),

	/// A file could not be located or read
	#[error(transparent)]
	Vfs(#[from] VfsError),

	/// A file was found but failed to parse
	#[error(transparent)]
	File(#[from] FifeFileError),
}

impl PipelineError {
	/// Returns `true` if the requested file does not exist in any source.
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::Vfs(error) => error.is_not_found(),
			Self::File(error) => error.is_not_found(),
			Self::Config(_) => false,
		}
	}
}
