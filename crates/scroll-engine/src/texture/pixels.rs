use std::path::Path;

use image::DynamicImage;

use super::TextureError;

/// Tightly packed 8-bit image in its native channel count.
///
/// Invariants:
/// - `channels` is in `1..=4` (grey, grey+alpha, RGB, RGBA)
/// - `data.len() == width * height * channels`
/// - rows are stored top to bottom with no padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw pixel bytes after checking the channel count and length.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, TextureError> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::UnsupportedChannels(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(TextureError::DataLength {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Loads an image file, keeping its channel count.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let pixels = Self::from_image(img);
        log::debug!(
            "loaded {} ({}x{}, {} channels)",
            path.display(),
            pixels.width,
            pixels.height,
            pixels.channels
        );
        Ok(pixels)
    }

    /// Decodes an in-memory encoded image (PNG, JPEG, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes).map_err(TextureError::Decode)?;
        Ok(Self::from_image(img))
    }

    /// Converts a decoded image, narrowing deeper formats to 8 bits per channel.
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let channels = img.color().channel_count().clamp(1, 4);

        let data = match channels {
            1 => img.into_luma8().into_raw(),
            2 => img.into_luma_alpha8().into_raw(),
            3 => img.into_rgb8().into_raw(),
            _ => img.into_rgba8().into_raw(),
        };

        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the channel bytes of pixel `(x, y)`, or `None` if out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let ch = self.channels as usize;
        let start = y as usize * self.stride() + x as usize * ch;
        self.data.get(start..start + ch)
    }

    /// Expands to RGBA8.
    ///
    /// Grey is replicated into RGB; a missing alpha channel becomes opaque.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);

        for px in self.data.chunks_exact(self.channels as usize) {
            let rgba = match *px {
                [l] => [l, l, l, 255],
                [l, a] => [l, l, l, a],
                [r, g, b] => [r, g, b, 255],
                [r, g, b, a] => [r, g, b, a],
                _ => [0, 0, 0, 0],
            };
            out.extend_from_slice(&rgba);
        }

        image::RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }
}
