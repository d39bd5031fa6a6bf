//! Texture assets: flat image decoding and a handle-based store.
//!
//! The renderer consumes textures by [`TextureHandle`], never by raw file
//! paths. A texture that fails to load is logged and mapped to
//! [`TextureHandle::INVALID`]; the demo keeps running with a placeholder.

use flashgrid_common::{SurfaceTexturePaths, TextureHandle, TextureSettings};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Luma, Pixel, Rgb, Rgba};
use std::path::{Path, PathBuf};

/// Channel layout of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelFormat {
    /// One channel, sampled as red.
    Red,
    Rgb,
    Rgba,
}

impl TexelFormat {
    pub fn channels(self) -> usize {
        match self {
            TexelFormat::Red => 1,
            TexelFormat::Rgb => 3,
            TexelFormat::Rgba => 4,
        }
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image {path} has zero size")]
    Empty { path: PathBuf },
}

/// Tightly packed 8-bit pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: TexelFormat,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decode an image file. 1-channel sources map to [`TexelFormat::Red`],
    /// 3-channel to `Rgb`, 4-channel to `Rgba`; anything else becomes `Rgba`.
    pub fn decode(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let img = image::load_from_memory(&bytes)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(AssetError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (format, pixels) = match img.color().channel_count() {
            1 => (TexelFormat::Red, img.into_luma8().into_raw()),
            3 => (TexelFormat::Rgb, img.into_rgb8().into_raw()),
            _ => (TexelFormat::Rgba, img.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    /// 1×1 opaque black, what sampling an unusable texture yields.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            format: TexelFormat::Rgba,
            pixels: vec![0, 0, 0, 255],
        }
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.format.channels() as u32
    }

    /// Expand `Rgb` to `Rgba` with opaque alpha; other formats are unchanged.
    pub fn with_alpha(&self) -> DecodedImage {
        match self.format {
            TexelFormat::Rgb => DecodedImage {
                width: self.width,
                height: self.height,
                format: TexelFormat::Rgba,
                pixels: self
                    .pixels
                    .chunks_exact(3)
                    .flat_map(|p| [p[0], p[1], p[2], 255])
                    .collect(),
            },
            _ => self.clone(),
        }
    }

    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// This image followed by successively halved levels down to 1×1.
    pub fn mip_chain(&self) -> Vec<DecodedImage> {
        let mut chain = vec![self.clone()];
        while let Some(next) = chain.last().and_then(DecodedImage::downsample) {
            chain.push(next);
        }
        chain
    }

    fn downsample(&self) -> Option<DecodedImage> {
        if self.width <= 1 && self.height <= 1 {
            return None;
        }
        let (w, h) = ((self.width / 2).max(1), (self.height / 2).max(1));
        let pixels = match self.format {
            TexelFormat::Red => resize_raw::<Luma<u8>>(self, w, h),
            TexelFormat::Rgb => resize_raw::<Rgb<u8>>(self, w, h),
            TexelFormat::Rgba => resize_raw::<Rgba<u8>>(self, w, h),
        }?;
        Some(DecodedImage {
            width: w,
            height: h,
            format: self.format,
            pixels,
        })
    }
}

fn resize_raw<P>(img: &DecodedImage, width: u32, height: u32) -> Option<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let buffer: ImageBuffer<P, &[u8]> =
        ImageBuffer::from_raw(img.width, img.height, img.pixels.as_slice())?;
    Some(imageops::resize(&buffer, width, height, FilterType::Triangle).into_raw())
}

/// Diffuse + specular pair for one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTextures {
    pub diffuse: TextureHandle,
    pub specular: TextureHandle,
}

/// Texture pairs for every surface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialSet {
    pub ground: SurfaceTextures,
    pub wall: SurfaceTextures,
}

/// Decoded textures indexed by handle.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    images: Vec<DecodedImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already decoded image.
    pub fn insert(&mut self, image: DecodedImage) -> TextureHandle {
        let handle = TextureHandle(self.images.len() as u32);
        self.images.push(image);
        handle
    }

    /// Decode and register a file. Failures are logged, not propagated.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureHandle {
        let path = path.as_ref();
        match DecodedImage::decode(path) {
            Ok(image) => {
                tracing::debug!(
                    "loaded texture {} ({}x{}, {:?})",
                    path.display(),
                    image.width,
                    image.height,
                    image.format
                );
                self.insert(image)
            }
            Err(e) => {
                tracing::error!("texture failed to load at path {}: {e}", path.display());
                TextureHandle::INVALID
            }
        }
    }

    pub fn load_pair(&mut self, paths: &SurfaceTexturePaths) -> SurfaceTextures {
        SurfaceTextures {
            diffuse: self.load(&paths.diffuse),
            specular: self.load(&paths.specular),
        }
    }

    pub fn load_materials(&mut self, settings: &TextureSettings) -> MaterialSet {
        MaterialSet {
            ground: self.load_pair(&settings.ground),
            wall: self.load_pair(&settings.wall),
        }
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&DecodedImage> {
        self.images.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn decode_maps_channel_counts() {
        let dir = tempfile::tempdir().unwrap();

        let gray = dir.path().join("gray.png");
        GrayImage::from_pixel(4, 2, Luma([7])).save(&gray).unwrap();
        let rgb = dir.path().join("rgb.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&rgb).unwrap();
        let rgba = dir.path().join("rgba.png");
        RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 4])).save(&rgba).unwrap();

        let g = DecodedImage::decode(&gray).unwrap();
        assert_eq!(g.format, TexelFormat::Red);
        assert_eq!(g.pixels.len(), 8);
        assert_eq!(g.bytes_per_row(), 4);

        let c = DecodedImage::decode(&rgb).unwrap();
        assert_eq!(c.format, TexelFormat::Rgb);
        assert_eq!(&c.pixels[..3], &[1, 2, 3]);

        let a = DecodedImage::decode(&rgba).unwrap();
        assert_eq!(a.format, TexelFormat::Rgba);
        assert_eq!(a.pixels, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn missing_file_yields_invalid_handle() {
        let mut store = TextureStore::new();
        let handle = store.load("/no/such/texture.png");
        assert_eq!(handle, TextureHandle::INVALID);
        assert!(store.is_empty());
        assert!(store.get(handle).is_none());
    }

    #[test]
    fn garbage_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            DecodedImage::decode(&path),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn store_hands_out_sequential_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tex.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path).unwrap();

        let mut store = TextureStore::new();
        let pair = store.load_pair(&SurfaceTexturePaths {
            diffuse: path.clone(),
            specular: dir.path().join("missing.png"),
        });
        assert_eq!(pair.diffuse, TextureHandle(0));
        assert_eq!(pair.specular, TextureHandle::INVALID);
        assert_eq!(store.get(pair.diffuse).unwrap().width, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rgb_expands_to_rgba() {
        let img = DecodedImage {
            width: 2,
            height: 1,
            format: TexelFormat::Rgb,
            pixels: vec![1, 2, 3, 4, 5, 6],
        };
        let expanded = img.with_alpha();
        assert_eq!(expanded.format, TexelFormat::Rgba);
        assert_eq!(expanded.pixels, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn mip_chain_halves_to_one() {
        let img = DecodedImage::from_dynamic(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            8,
            4,
            Rgba([200, 100, 50, 255]),
        )));
        assert_eq!(img.mip_level_count(), 4);
        let chain = img.mip_chain();
        let sizes: Vec<_> = chain.iter().map(|m| (m.width, m.height)).collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
        let last = &chain.last().unwrap().pixels;
        for (got, want) in last.iter().zip([200u8, 100, 50, 255]) {
            assert!(got.abs_diff(want) <= 1);
        }

        let red = DecodedImage::from_dynamic(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            4,
            4,
            Luma([80]),
        )));
        let chain = red.mip_chain();
        assert_eq!(chain.len(), 3);
        assert!(chain.iter().all(|m| m.format == TexelFormat::Red));
        assert_eq!(chain[2].pixels.len(), 1);
        assert!(chain[2].pixels[0].abs_diff(80) <= 1);
    }

    #[test]
    fn placeholder_is_opaque_black() {
        let p = DecodedImage::placeholder();
        assert_eq!((p.width, p.height), (1, 1));
        assert_eq!(p.pixels, vec![0, 0, 0, 255]);
        assert_eq!(p.mip_level_count(), 1);
    }
}
