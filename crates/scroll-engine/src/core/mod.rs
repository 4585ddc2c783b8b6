//! Engine-facing application contract.
//!
//! The runtime owns the window and GPU; an `App` only sees them through
//! `RenderCtx` at startup and `FrameCtx` once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
