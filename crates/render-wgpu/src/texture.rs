use flashgrid_assets::{DecodedImage, TexelFormat};

/// A sampled 2D texture with its full mip chain uploaded.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Upload `image` and every level of its mip chain.
    ///
    /// Single-channel images stay single-channel (`R8Unorm`); colour images
    /// are widened to RGBA8 since wgpu has no 3-channel format.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        srgb: bool,
        label: &str,
    ) -> Self {
        let (format, levels) = prepare_levels(image, srgb);
        let base = &levels[0];

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: base.width,
                height: base.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &mip.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(mip.bytes_per_row()),
                    rows_per_image: Some(mip.height),
                },
                wgpu::Extent3d {
                    width: mip.width,
                    height: mip.height,
                    depth_or_array_layers: 1,
                },
            );
        }
        tracing::debug!(
            "uploaded {label}: {}x{} {:?}, {} mips",
            base.width,
            base.height,
            format,
            levels.len()
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Pick the upload format and build the mip levels to write.
///
/// The texture's level count comes from the returned chain, so a chain that
/// ends early never leaves levels allocated but unwritten.
fn prepare_levels(image: &DecodedImage, srgb: bool) -> (wgpu::TextureFormat, Vec<DecodedImage>) {
    let (base, format) = match image.format {
        TexelFormat::Red => (image.clone(), wgpu::TextureFormat::R8Unorm),
        _ if srgb => (image.with_alpha(), wgpu::TextureFormat::Rgba8UnormSrgb),
        _ => (image.with_alpha(), wgpu::TextureFormat::Rgba8Unorm),
    };
    let levels = base.mip_chain();
    if levels.len() as u32 != base.mip_level_count() {
        tracing::warn!(
            "mip chain for {}x{} image has {} levels, expected {}",
            base.width,
            base.height,
            levels.len(),
            base.mip_level_count()
        );
    }
    (format, levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, format: TexelFormat) -> DecodedImage {
        let channels = match format {
            TexelFormat::Red => 1,
            TexelFormat::Rgb => 3,
            TexelFormat::Rgba => 4,
        };
        DecodedImage {
            width,
            height,
            format,
            pixels: vec![128; (width * height) as usize * channels],
        }
    }

    #[test]
    fn rgb_is_widened_and_fully_chained() {
        let (format, levels) = prepare_levels(&solid(8, 4, TexelFormat::Rgb), true);
        assert_eq!(format, wgpu::TextureFormat::Rgba8UnormSrgb);
        let sizes: Vec<_> = levels.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
        for mip in &levels {
            assert_eq!(mip.format, TexelFormat::Rgba);
            assert_eq!(mip.pixels.len() as u32, mip.bytes_per_row() * mip.height);
        }
    }

    #[test]
    fn red_stays_single_channel() {
        let (format, levels) = prepare_levels(&solid(4, 4, TexelFormat::Red), true);
        assert_eq!(format, wgpu::TextureFormat::R8Unorm);
        assert!(levels.iter().all(|m| m.format == TexelFormat::Red));
        assert_eq!(levels.len(), 3);
    }

    #[test]
    fn linear_colour_for_specular_maps() {
        let (format, levels) = prepare_levels(&solid(1, 1, TexelFormat::Rgba), false);
        assert_eq!(format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(levels.len(), 1);
    }
}
