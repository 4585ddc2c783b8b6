//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, and wires them to the
//! GPU layer and the `core::App` callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
