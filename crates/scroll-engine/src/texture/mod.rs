//! Image loading, sub-region extraction and GPU upload.
//!
//! CPU side (`PixelBuffer`, `crop`, `Tileset`, mip chains) is GPU-free and
//! unit-tested. `GpuTexture` turns a buffer into a sampled wgpu texture.

mod error;
mod gpu;
mod mipmap;
mod pixels;
mod region;
mod tileset;

pub use error::TextureError;
pub use gpu::{GpuTexture, TextureOptions};
pub use mipmap::{build_mip_chain, mip_level_count};
pub use pixels::PixelBuffer;
pub use region::{crop, PixelRect};
pub use tileset::Tileset;

pub use wgpu::AddressMode;
