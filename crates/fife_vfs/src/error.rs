//! Error type for the virtual file system.

use std::path::PathBuf;

use fife_types::file::FifeFileError;
use thiserror::Error;

/// Errors raised while registering sources or opening files.
#[derive(Debug, Error)]
pub enum VfsError {
	/// No registered source contains the file
	#[error("file not found in any source: {0}")]
	NotFound(String),

	/// No provider recognises the file as an archive
	#[error("no provider recognises {}", .0.display())]
	NoProvider(PathBuf),

	/// The underlying format failed to parse or decode
	#[error(transparent)]
	File(#[from] FifeFileError),

	/// Reading from the host file system failed
	#[error("{}: {source}", path.display())]
	Io {
		/// Path being accessed
		path: PathBuf,
		/// Underlying error
		#[source]
		source: std::io::Error,
	},
}

impl VfsError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	/// Returns `true` for [`VfsError::NotFound`] and for a wrapped
	/// [`FifeFileError::NotFound`].
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::NotFound(_) => true,
			Self::File(error) => error.is_not_found(),
			_ => false,
		}
	}
}
