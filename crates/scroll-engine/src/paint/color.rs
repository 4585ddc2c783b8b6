/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Dark teal used as the default viewer background.
    pub const SLATE: Color = Color::rgba(0.2, 0.3, 0.3, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Converts to the `f64` color wgpu uses for clear operations.
    ///
    /// The channels are written as-is; on an sRGB surface the GPU encodes them.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        let c = self.clamped();
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: c.a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_wgpu_clamps_out_of_range() {
        let w = Color::rgba(1.5, -0.5, 0.25, 2.0).to_wgpu();
        assert_eq!((w.r, w.g, w.b, w.a), (1.0, 0.0, 0.25, 1.0));
    }

    #[test]
    fn slate_matches_default_background() {
        let w = Color::SLATE.to_wgpu();
        assert!((w.r - 0.2).abs() < 1e-6);
        assert!((w.g - 0.3).abs() < 1e-6);
        assert!((w.b - 0.3).abs() < 1e-6);
        assert_eq!(w.a, 1.0);
    }
}
