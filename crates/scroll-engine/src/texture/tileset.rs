use std::path::Path;

use super::{crop, PixelBuffer, PixelRect, TextureError};

/// An image sliced into a grid of equally sized tiles.
///
/// Tiles are indexed row-major from the top-left. Pixels past the last whole
/// column or row are not addressable as tiles.
#[derive(Debug, Clone)]
pub struct Tileset {
    image: PixelBuffer,
    tile_width: u32,
    tile_height: u32,
}

impl Tileset {
    pub fn new(image: PixelBuffer, tile_width: u32, tile_height: u32) -> Result<Self, TextureError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(TextureError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        let set = Self {
            image,
            tile_width,
            tile_height,
        };

        if set.image.width() % tile_width != 0 || set.image.height() % tile_height != 0 {
            log::warn!(
                "tileset {}x{} is not a multiple of the {}x{} tile size; edge pixels are unused",
                set.image.width(),
                set.image.height(),
                tile_width,
                tile_height
            );
        }

        Ok(set)
    }

    /// Loads an image file and slices it with the given tile size.
    pub fn load(path: impl AsRef<Path>, tile_width: u32, tile_height: u32) -> Result<Self, TextureError> {
        let image = PixelBuffer::load(path)?;
        Self::new(image, tile_width, tile_height)
    }

    #[inline]
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.image.width() / self.tile_width
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.image.height() / self.tile_height
    }

    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.columns().saturating_mul(self.rows())
    }

    /// Pixel rect of the tile at grid position `(col, row)`.
    pub fn tile_rect_at(&self, col: u32, row: u32) -> Result<PixelRect, TextureError> {
        if col >= self.columns() || row >= self.rows() {
            return Err(TextureError::TileOutOfRange {
                index: row.saturating_mul(self.columns()).saturating_add(col),
                count: self.tile_count(),
            });
        }

        Ok(PixelRect::new(
            col * self.tile_width,
            row * self.tile_height,
            self.tile_width,
            self.tile_height,
        ))
    }

    /// Pixel rect of tile `index` (row-major).
    pub fn tile_rect(&self, index: u32) -> Result<PixelRect, TextureError> {
        let count = self.tile_count();
        if index >= count {
            return Err(TextureError::TileOutOfRange { index, count });
        }

        let cols = self.columns();
        self.tile_rect_at(index % cols, index / cols)
    }

    /// Copies tile `index` out of the tileset.
    pub fn tile(&self, index: u32) -> Result<PixelBuffer, TextureError> {
        crop(&self.image, self.tile_rect(index)?)
    }

    /// Copies an arbitrary pixel region out of the tileset image.
    pub fn region(&self, rect: PixelRect) -> Result<PixelBuffer, TextureError> {
        crop(&self.image, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x4 RGBA image of 2x2 tiles; red channel = x, green = y.
    fn sheet() -> Tileset {
        let mut data = Vec::new();
        for y in 0..4u8 {
            for x in 0..5u8 {
                data.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        let image = PixelBuffer::from_raw(5, 4, 4, data).unwrap();
        Tileset::new(image, 2, 2).unwrap()
    }

    #[test]
    fn grid_ignores_partial_column() {
        let set = sheet();
        assert_eq!(set.columns(), 2);
        assert_eq!(set.rows(), 2);
        assert_eq!(set.tile_count(), 4);
    }

    #[test]
    fn tile_rect_is_row_major() {
        let set = sheet();
        assert_eq!(set.tile_rect(0).unwrap(), PixelRect::new(0, 0, 2, 2));
        assert_eq!(set.tile_rect(1).unwrap(), PixelRect::new(2, 0, 2, 2));
        assert_eq!(set.tile_rect(2).unwrap(), PixelRect::new(0, 2, 2, 2));
        assert_eq!(set.tile_rect(3).unwrap(), set.tile_rect_at(1, 1).unwrap());
    }

    #[test]
    fn tile_out_of_range() {
        let set = sheet();
        let err = set.tile_rect(4).unwrap_err();
        assert!(matches!(err, TextureError::TileOutOfRange { index: 4, count: 4 }));
        assert!(set.tile_rect_at(2, 0).is_err());
    }

    #[test]
    fn tile_copies_pixels() {
        let tile = sheet().tile(3).unwrap();
        assert_eq!(tile.dimensions(), (2, 2));
        assert_eq!(tile.pixel(0, 0), Some(&[2u8, 2, 0, 255][..]));
        assert_eq!(tile.pixel(1, 1), Some(&[3u8, 3, 0, 255][..]));
    }

    #[test]
    fn zero_tile_size_rejected() {
        let image = PixelBuffer::from_raw(1, 1, 1, vec![0]).unwrap();
        assert!(matches!(
            Tileset::new(image, 0, 16),
            Err(TextureError::ZeroTileSize { width: 0, height: 16 })
        ));
    }

    #[test]
    fn region_may_span_tiles() {
        let px = sheet().region(PixelRect::new(1, 1, 3, 1)).unwrap();
        assert_eq!(px.pixel(2, 0), Some(&[3u8, 1, 0, 255][..]));
    }

    #[test]
    fn bundled_tileset_has_sixteen_tiles() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/tileset.png");
        let set = Tileset::load(path, 16, 16).unwrap();
        assert_eq!(set.tile_count(), 16);
        assert_eq!(set.tile(0).unwrap().dimensions(), (16, 16));
    }
}
