use winit::dpi::PhysicalSize;

/// Knobs for [`Gpu::new`](super::Gpu::new).
///
/// The defaults target the widest range of adapters: downlevel limits, no
/// optional features, vsync.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Use an sRGB surface when the adapter offers one. Sprite textures are
    /// stored as sRGB, so this keeps texel colors unchanged on screen.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub(crate) fn device_descriptor(&self) -> wgpu::DeviceDescriptor<'static> {
        wgpu::DeviceDescriptor {
            label: Some("scroll device"),
            required_features: self.required_features,
            required_limits: self.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        }
    }

    /// Render-attachment configuration for a `size` drawable.
    pub(crate) fn surface_config(
        &self,
        format: wgpu::TextureFormat,
        alpha_mode: wgpu::CompositeAlphaMode,
        size: PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: self.present_mode,
            alpha_mode,
            view_formats: Vec::new(),
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_portable() {
        let init = GpuInit::default();
        assert!(init.prefer_srgb);
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert!(init.required_features.is_empty());

        let desc = init.device_descriptor();
        assert_eq!(
            desc.required_limits.max_texture_dimension_2d,
            wgpu::Limits::downlevel_defaults().max_texture_dimension_2d
        );
    }

    #[test]
    fn surface_config_carries_size_and_choices() {
        let init = GpuInit {
            present_mode: wgpu::PresentMode::Mailbox,
            desired_maximum_frame_latency: 3,
            ..GpuInit::default()
        };
        let config = init.surface_config(
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::CompositeAlphaMode::Opaque,
            PhysicalSize::new(512, 480),
        );

        assert_eq!((config.width, config.height), (512, 480));
        assert_eq!(config.format, wgpu::TextureFormat::Bgra8UnormSrgb);
        assert_eq!(config.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
        assert_eq!(config.desired_maximum_frame_latency, 3);
        assert_eq!(config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
    }
}
