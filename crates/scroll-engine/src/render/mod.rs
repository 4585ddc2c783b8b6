//! GPU rendering.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! record into a `RenderTarget` handed out by `core::FrameCtx::render`.
//!
//! Convention:
//! - CPU geometry is in canvas pixels (top-left origin, +Y down).
//! - The vertex shader converts to NDC using a canvas uniform.

mod ctx;
pub mod sprite;

pub use ctx::{RenderCtx, RenderTarget};
pub use sprite::{Sprite, SpriteRenderer};
