use std::fmt;

use super::{PixelBuffer, TextureError};

/// Integer pixel rectangle, top-left origin.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The rectangle covering a whole `width x height` image.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge, or `None` on overflow.
    #[inline]
    pub fn right(self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Exclusive bottom edge, or `None` on overflow.
    #[inline]
    pub fn bottom(self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// True when the rect lies entirely inside a `width x height` image.
    #[inline]
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.right().is_some_and(|r| r <= width) && self.bottom().is_some_and(|b| b <= height)
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Copies the `rect` sub-region of `src` into a new, tightly packed buffer.
///
/// Each output row is one contiguous slice of the matching source row, so the
/// copy is `rect.height` memcpys. The source channel count is preserved.
///
/// Fails without reading anything if `rect` is empty or not fully inside `src`.
pub fn crop(src: &PixelBuffer, rect: PixelRect) -> Result<PixelBuffer, TextureError> {
    if rect.is_empty() {
        return Err(TextureError::EmptyRegion(rect));
    }

    if !rect.fits_within(src.width(), src.height()) {
        return Err(TextureError::RegionOutOfBounds {
            rect,
            width: src.width(),
            height: src.height(),
        });
    }

    let ch = src.channels() as usize;
    let src_stride = src.stride();
    let row_len = rect.width as usize * ch;
    let bytes = src.as_bytes();

    let mut out = Vec::with_capacity(row_len * rect.height as usize);
    for row in 0..rect.height as usize {
        let start = (row + rect.y as usize) * src_stride + rect.x as usize * ch;
        out.extend_from_slice(&bytes[start..start + row_len]);
    }

    PixelBuffer::from_raw(rect.width, rect.height, src.channels(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 image where channel `c` of pixel `(x, y)` is `y * 10 + x + c * 50`.
    fn grid(channels: u8) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..3u8 {
            for x in 0..4u8 {
                for c in 0..channels {
                    data.push((y * 10 + x) + c * 50);
                }
            }
        }
        PixelBuffer::from_raw(4, 3, channels, data).unwrap()
    }

    #[test]
    fn crop_interior_rows() {
        let out = crop(&grid(1), PixelRect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.as_bytes(), &[11, 12, 21, 22]);
    }

    #[test]
    fn crop_top_left_tile() {
        let out = crop(&grid(1), PixelRect::new(0, 0, 2, 1)).unwrap();
        assert_eq!(out.as_bytes(), &[0, 1]);
    }

    #[test]
    fn crop_preserves_channels() {
        let out = crop(&grid(3), PixelRect::new(3, 2, 1, 1)).unwrap();
        assert_eq!(out.channels(), 3);
        assert_eq!(out.as_bytes(), &[23, 73, 123]);
    }

    #[test]
    fn crop_full_image_is_identity() {
        let src = grid(4);
        let out = crop(&src, PixelRect::full(4, 3)).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn crop_touching_far_edges_is_allowed() {
        let out = crop(&grid(2), PixelRect::new(2, 1, 2, 2)).unwrap();
        assert_eq!(out.pixel(1, 1), Some(&[23u8, 73][..]));
    }

    #[test]
    fn crop_rejects_out_of_bounds() {
        let err = crop(&grid(1), PixelRect::new(3, 0, 2, 1)).unwrap_err();
        assert!(matches!(
            err,
            TextureError::RegionOutOfBounds { width: 4, height: 3, .. }
        ));

        assert!(crop(&grid(1), PixelRect::new(0, 2, 1, 2)).is_err());
    }

    #[test]
    fn crop_rejects_overflowing_rect() {
        let err = crop(&grid(1), PixelRect::new(u32::MAX, 0, 2, 1)).unwrap_err();
        assert!(matches!(err, TextureError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn crop_rejects_empty_rect() {
        let err = crop(&grid(1), PixelRect::new(0, 0, 0, 1)).unwrap_err();
        assert!(matches!(err, TextureError::EmptyRegion(_)));
    }

    #[test]
    fn display_is_geometry_style() {
        assert_eq!(PixelRect::new(16, 32, 8, 4).to_string(), "8x4+16+32");
    }
}
