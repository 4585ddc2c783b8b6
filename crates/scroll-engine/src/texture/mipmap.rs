use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Number of levels in a full mip chain down to 1x1.
///
/// `floor(log2(max(w, h))) + 1`; a zero-sized image still has one level.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    u32::BITS - largest.leading_zeros()
}

/// Builds `levels` mip levels, level 0 being `base` itself.
///
/// Each following level halves both dimensions (never below 1) with a
/// triangle filter, which matches a bilinear box-down closely enough for
/// pixel-art tiles.
pub fn build_mip_chain(base: RgbaImage, levels: u32) -> Vec<RgbaImage> {
    let levels = levels.max(1);
    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base);

    while (chain.len() as u32) < levels {
        let Some(prev) = chain.last() else { break };
        let (w, h) = prev.dimensions();
        if w == 1 && h == 1 {
            break;
        }
        let next = imageops::resize(prev, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        chain.push(next);
    }

    chain
}
