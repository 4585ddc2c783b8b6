use super::{build_mip_chain, mip_level_count, PixelBuffer, TextureError};

/// Upload parameters for [`GpuTexture::upload`].
#[derive(Debug, Clone)]
pub struct TextureOptions {
    pub label: String,

    /// Wrap mode on u, v and w.
    pub address_mode: wgpu::AddressMode,

    /// Generate and upload a full mip chain; sampled with linear mip filtering.
    pub generate_mipmaps: bool,

    /// Store as `Rgba8UnormSrgb` rather than `Rgba8Unorm`.
    pub srgb: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            label: "scroll texture".to_string(),
            address_mode: wgpu::AddressMode::Repeat,
            generate_mipmaps: true,
            srgb: true,
        }
    }
}

impl TextureOptions {
    fn format(&self) -> wgpu::TextureFormat {
        if self.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

/// A sampled 2D RGBA texture view and its sampler.
#[derive(Debug)]
pub struct GpuTexture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

/// Fails when either side exceeds the device's 2D texture limit.
fn check_size(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

impl GpuTexture {
    /// Uploads `pixels` as a new texture.
    ///
    /// The buffer is expanded to RGBA8 first; every mip level is written with
    /// its own `write_texture` call.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelBuffer,
        options: &TextureOptions,
    ) -> Result<Self, TextureError> {
        let (width, height) = pixels.dimensions();
        if pixels.is_empty() {
            return Err(TextureError::EmptyTexture { width, height });
        }
        check_size(width, height, device.limits().max_texture_dimension_2d)?;

        let levels = if options.generate_mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };
        let chain = build_mip_chain(pixels.to_rgba8(), levels);
        let mip_level_count = chain.len() as u32;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&options.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: options.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in chain.iter().enumerate() {
            let (w, h) = mip.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                mip.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(w * 4),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mipmap_filter = if mip_level_count > 1 {
            wgpu::MipmapFilterMode::Linear
        } else {
            wgpu::MipmapFilterMode::Nearest
        };

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&options.label),
            address_mode_u: options.address_mode,
            address_mode_v: options.address_mode,
            address_mode_w: options.address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter,
            ..Default::default()
        });

        log::info!(
            "uploaded texture '{}' {}x{} ({} mip levels, {:?})",
            options.label,
            width,
            height,
            mip_level_count,
            options.format()
        );

        Ok(Self { view, sampler })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_repeat_with_mips() {
        let opts = TextureOptions::default();
        assert_eq!(opts.address_mode, wgpu::AddressMode::Repeat);
        assert!(opts.generate_mipmaps);
        assert_eq!(opts.format(), wgpu::TextureFormat::Rgba8UnormSrgb);
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(check_size(2048, 16, 2048).is_ok());
        assert!(check_size(2048, 2048, 2048).is_ok());
    }

    #[test]
    fn oversized_texture_rejected() {
        let err = check_size(4096, 16, 2048).unwrap_err();
        assert!(matches!(
            err,
            TextureError::TooLarge { width: 4096, height: 16, max: 2048 }
        ));
        assert!(check_size(16, 2049, 2048).is_err());
        assert_eq!(
            err.to_string(),
            "texture 4096x16 exceeds the device limit of 2048 pixels per side"
        );
    }

    #[test]
    fn linear_format_when_not_srgb() {
        let opts = TextureOptions {
            srgb: false,
            ..Default::default()
        };
        assert_eq!(opts.format(), wgpu::TextureFormat::Rgba8Unorm);
    }
}
