//! Scroll engine crate.
//!
//! Window, GPU device and tile-sprite plumbing used by the viewer binary.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod render;
pub mod shader;
pub mod texture;
