//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use scroll_engine::coords::{Vec2, Viewport};
use scroll_engine::logging::LoggingConfig;
use scroll_engine::texture::{AddressMode, PixelRect, TextureOptions};

#[derive(Debug, Parser)]
#[command(name = "scroll-viewer")]
#[command(author, version, about = "Draws one tile of a tileset at a fixed canvas position")]
pub struct Args {
    /// Tileset image (PNG, JPEG, BMP or GIF)
    #[arg(long, default_value = "assets/tileset.png")]
    pub tileset: PathBuf,

    /// Tile size as WxH
    #[arg(long, value_name = "WxH", default_value = "16x16", value_parser = parse_size)]
    pub tile_size: (u32, u32),

    /// Row-major tile index to draw
    #[arg(long, value_name = "INDEX", conflicts_with = "crop")]
    pub tile: Option<u32>,

    /// Draw an arbitrary pixel region instead of a whole tile
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_crop)]
    pub crop: Option<PixelRect>,

    /// Sprite top-left corner in canvas pixels; may be negative
    #[arg(
        long,
        value_name = "X,Y",
        default_value = "100,100",
        allow_hyphen_values = true,
        value_parser = parse_pos
    )]
    pub pos: Vec2,

    /// On-screen size multiplier
    #[arg(long, default_value = "1", value_parser = parse_scale)]
    pub scale: f32,

    /// Virtual resolution as WxH; also the initial window size
    #[arg(long, value_name = "WxH", default_value = "256x240", value_parser = parse_size)]
    pub canvas: (u32, u32),

    /// WGSL vertex shader to use instead of the built-in one
    #[arg(long, value_name = "PATH")]
    pub vertex_shader: Option<PathBuf>,

    /// WGSL fragment shader to use instead of the built-in one
    #[arg(long, value_name = "PATH")]
    pub fragment_shader: Option<PathBuf>,

    /// Upload a single mip level
    #[arg(long)]
    pub no_mipmaps: bool,

    /// Clamp texture coordinates to the edge instead of repeating
    #[arg(long)]
    pub clamp: bool,

    /// Log filter, overrides RUST_LOG (e.g. "debug" or "scroll_engine=trace")
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

/// Which part of the tileset becomes the sprite texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Selection {
    Tile(u32),
    Region(PixelRect),
}

/// Resolved viewer settings.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub tileset: PathBuf,
    pub tile_size: (u32, u32),
    pub selection: Selection,
    pub position: Vec2,
    pub scale: f32,
    pub canvas: Viewport,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
    pub texture: TextureOptions,
}

impl Args {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            ..Default::default()
        }
    }

    pub fn into_config(self) -> ViewerConfig {
        let selection = match self.crop {
            Some(rect) => Selection::Region(rect),
            None => Selection::Tile(self.tile.unwrap_or(0)),
        };

        let texture = TextureOptions {
            label: format!("{}", self.tileset.display()),
            address_mode: if self.clamp {
                AddressMode::ClampToEdge
            } else {
                AddressMode::Repeat
            },
            generate_mipmaps: !self.no_mipmaps,
            ..Default::default()
        };

        ViewerConfig {
            tileset: self.tileset,
            tile_size: self.tile_size,
            selection,
            position: self.pos,
            scale: self.scale,
            canvas: Viewport::new(self.canvas.0 as f32, self.canvas.1 as f32),
            vertex_shader: self.vertex_shader,
            fragment_shader: self.fragment_shader,
            texture,
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got {w}x{h}"));
    }
    Ok((w, h))
}

fn parse_pos(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    let pos = Vec2::new(x, y);
    if !pos.is_finite() {
        return Err(format!("position must be finite, got '{s}'"));
    }
    Ok(pos)
}

fn parse_crop(s: &str) -> Result<PixelRect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("bad region '{s}': {e}"))?;

    let &[x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected X,Y,W,H, got '{s}'"));
    };
    Ok(PixelRect::new(x, y, w, h))
}

fn parse_scale(s: &str) -> Result<f32, String> {
    let v: f32 = s.trim().parse().map_err(|e| format!("bad scale '{s}': {e}"))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(format!("scale must be positive, got {v}"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("scroll-viewer").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_draw_first_tile_at_100_100() {
        let cfg = parse(&[]).unwrap().into_config();
        assert_eq!(cfg.tileset, PathBuf::from("assets/tileset.png"));
        assert_eq!(cfg.tile_size, (16, 16));
        assert_eq!(cfg.selection, Selection::Tile(0));
        assert_eq!(cfg.position, Vec2::new(100.0, 100.0));
        assert_eq!(cfg.scale, 1.0);
        assert_eq!(cfg.canvas, Viewport::new(256.0, 240.0));
        assert!(cfg.texture.generate_mipmaps);
        assert!(cfg.vertex_shader.is_none());
    }

    #[test]
    fn negative_pos_is_a_value() {
        let cfg = parse(&["--pos", "-4,12"]).unwrap().into_config();
        assert_eq!(cfg.position, Vec2::new(-4.0, 12.0));

        let cfg = parse(&["--pos=-8,-2.5", "--scale", "2"]).unwrap().into_config();
        assert_eq!(cfg.position, Vec2::new(-8.0, -2.5));
        assert_eq!(cfg.scale, 2.0);
    }

    #[test]
    fn crop_selects_region() {
        let cfg = parse(&["--crop", "16,0,8,8"]).unwrap().into_config();
        assert_eq!(cfg.selection, Selection::Region(PixelRect::new(16, 0, 8, 8)));
    }

    #[test]
    fn tile_and_crop_conflict() {
        assert!(parse(&["--tile", "3", "--crop", "0,0,1,1"]).is_err());
    }

    #[test]
    fn texture_flags() {
        let cfg = parse(&["--no-mipmaps", "--clamp"]).unwrap().into_config();
        assert!(!cfg.texture.generate_mipmaps);
        assert_eq!(cfg.texture.address_mode, AddressMode::ClampToEdge);
    }

    #[test]
    fn log_flag_becomes_filter() {
        let args = parse(&["--log", "debug"]).unwrap();
        assert_eq!(args.logging().env_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn size_parser() {
        assert_eq!(parse_size("32x8"), Ok((32, 8)));
        assert_eq!(parse_size("320X240"), Ok((320, 240)));
        assert!(parse_size("16").is_err());
        assert!(parse_size("0x16").is_err());
        assert!(parse_size("ax16").is_err());
    }

    #[test]
    fn pos_parser() {
        assert_eq!(parse_pos("-4.5, 12"), Ok(Vec2::new(-4.5, 12.0)));
        assert!(parse_pos("1").is_err());
        assert!(parse_pos("inf,0").is_err());
    }

    #[test]
    fn crop_parser() {
        assert_eq!(parse_crop("1,2,3,4"), Ok(PixelRect::new(1, 2, 3, 4)));
        assert!(parse_crop("1,2,3").is_err());
        assert!(parse_crop("1,2,3,-4").is_err());
    }

    #[test]
    fn scale_must_be_positive() {
        assert!(parse(&["--scale", "0"]).is_err());
        assert_eq!(parse(&["--scale", "2.5"]).unwrap().scale, 2.5);
    }
}
