//! Color representation used for clears and tints.

mod color;

pub use color::Color;
