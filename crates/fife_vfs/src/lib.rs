//! Virtual file system over Fallout archives and loose directories.
//!
//! A [`Vfs`] is an ordered list of [`Source`]s. Archives are recognised by a
//! [`ProviderRegistry`] that sniffs the DAT1 and DAT2 layouts, while
//! [`DirectorySource`] lets loose files shadow archived ones.
//!
//! # Examples
//!
//! ```no_run
//! use fife_types::file::Dat2Compression;
//! use fife_vfs::Vfs;
//!
//! let mut vfs = Vfs::fallout(Dat2Compression::Zlib);
//! vfs.add_directory("data")?;
//! vfs.add_archive("master.dat");
//! vfs.add_archive("critter.dat");
//!
//! let palette = vfs.open("color.pal")?;
//! # Ok::<(), fife_vfs::VfsError>(())
//! ```

mod dir;
mod error;
mod provider;
mod source;
mod vfs;

pub use dir::DirectorySource;
pub use error::VfsError;
pub use provider::{Factory, Predicate, Provider, ProviderRegistry, is_dat1, is_dat2};
pub use source::{ArchiveSource, Source};
pub use vfs::Vfs;
