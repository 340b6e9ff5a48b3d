#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `fife-fallout` loads legacy Fallout 1/2 assets: DAT1/DAT2 archives, the
//! archive LZSS variant, 256-colour palettes with colour cycling, and FRM sprites.
//!
pub use fife_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use fife_dylib;
