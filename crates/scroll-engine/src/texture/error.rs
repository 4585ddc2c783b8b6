use std::path::PathBuf;

use super::PixelRect;

/// Errors raised while loading, slicing or uploading images.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),

    #[error("unsupported channel count {0} (expected 1..=4)")]
    UnsupportedChannels(u8),

    #[error("pixel data is {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    DataLength {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },

    #[error("region {0} has zero area")]
    EmptyRegion(PixelRect),

    #[error("region {rect} does not fit inside {width}x{height} image")]
    RegionOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("tile size must be non-zero (got {width}x{height})")]
    ZeroTileSize { width: u32, height: u32 },

    #[error("tile index {index} out of range ({count} tiles)")]
    TileOutOfRange { index: u32, count: u32 },

    #[error("cannot upload an empty {width}x{height} texture")]
    EmptyTexture { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max} pixels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
}
