//! Forces dynamic linking of `fife_internal` when the `dynamic_linking` feature is enabled.

#![allow(unused_imports)]
#![allow(clippy::single_component_path_imports)]

use fife_internal;
