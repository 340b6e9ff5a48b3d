//! End to end tests for `fife-fallout`: archives and loose files mounted
//! through the virtual file system, decoded with the shared palette.

mod fixtures;
mod pipeline;
mod vfs;
