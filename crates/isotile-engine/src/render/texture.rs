use std::path::Path;

use anyhow::{Context, Result};

/// How a texture is decoded and sampled.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureOptions {
    /// Flip rows at decode time (bottom row first).
    ///
    /// wgpu addresses textures from the top-left, so sprites drawn with +Y down
    /// want this off; flip for sheets authored bottom-up.
    pub flip_vertically: bool,

    /// Min/mag filter. `Nearest` keeps pixel art crisp.
    pub filter: wgpu::FilterMode,

    /// Wrap mode for both axes.
    pub address_mode: wgpu::AddressMode,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_vertically: false,
            filter: wgpu::FilterMode::Linear,
            address_mode: wgpu::AddressMode::Repeat,
        }
    }
}

/// A sampled 2D RGBA texture.
pub struct Texture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl Texture {
    /// Decodes an image file to RGBA8 and uploads it.
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        options: TextureOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let rgba = decode_rgba(path, options.flip_vertically)?;
        let (width, height) = rgba.dimensions();

        log::info!("loaded texture {} ({width}x{height})", path.display());

        let label = path.display().to_string();
        Self::from_rgba(device, queue, &label, width, height, rgba.as_raw(), options)
    }

    /// Uploads tightly packed RGBA8 pixels (`width * height * 4` bytes).
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
        options: TextureOptions,
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture `{label}` has zero size");
        anyhow::ensure!(
            pixels.len() == (width as usize) * (height as usize) * 4,
            "texture `{label}`: expected {} RGBA bytes, got {}",
            (width as usize) * (height as usize) * 4,
            pixels.len()
        );

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: options.address_mode,
            address_mode_v: options.address_mode,
            address_mode_w: options.address_mode,
            mag_filter: options.filter,
            min_filter: options.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            view,
            sampler,
            width,
            height,
        })
    }

    /// 1x1 opaque white; sampling it leaves vertex colors unchanged.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        Self::from_rgba(
            device,
            queue,
            "isotile white texture",
            1,
            1,
            &[255; 4],
            TextureOptions::default(),
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(crate) fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Decodes `path` into RGBA8, optionally flipped.
fn decode_rgba(path: &Path, flip_vertically: bool) -> Result<image::RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to load texture file {}", path.display()))?;
    let img = if flip_vertically { img.flipv() } else { img };
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_two_row_png(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("isotile-{}-{name}.png", std::process::id()));
        let mut img = image::RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn decode_keeps_row_order_without_flip() {
        let path = write_two_row_png("noflip");
        let rgba = decode_rgba(&path, false).unwrap();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 255]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn decode_flips_rows() {
        let path = write_two_row_png("flip");
        let rgba = decode_rgba(&path, true).unwrap();
        assert_eq!(rgba.dimensions(), (1, 2));
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(rgba.get_pixel(0, 1).0, [255, 0, 0, 255]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = decode_rgba(Path::new("definitely-not-here/tiles.png"), false).unwrap_err();
        assert!(format!("{err:#}").contains("tiles.png"));
    }
}
