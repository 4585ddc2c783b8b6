//! Geometry types in canvas pixels.
//!
//! Canvas space:
//! - origin top-left
//! - +X right, +Y down
//!
//! The sprite vertex shader maps canvas pixels to NDC using a canvas uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
