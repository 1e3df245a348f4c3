//! Image decoding and GPU textures.
//!
//! Body surfaces are sRGB 2D textures loaded with the `image` crate; the
//! skybox is a six-face [`Cubemap`]. Both have procedural fallbacks so a
//! missing asset degrades to something visible instead of aborting.

use crate::gpu::GpuContext;
use glam::Vec3;

/// A GPU texture that can be bound to shaders.
#[derive(Debug)]
pub struct Texture {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Create a texture from raw RGBA data.
    pub fn from_rgba(gpu: &GpuContext, data: &[u8], width: u32, height: u32, label: &str) -> Self {
        use wgpu::util::DeviceExt;

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Repeat horizontally so the equirectangular seam wraps cleanly.
        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Load a texture from an image file.
    pub fn from_file(gpu: &GpuContext, path: &str) -> Result<Self, image::ImageError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(gpu, &img, width, height, path))
    }

    /// Load a texture from embedded bytes.
    pub fn from_bytes(
        gpu: &GpuContext,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, image::ImageError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::from_rgba(gpu, &img, width, height, label))
    }

    /// Generate a procedural surface texture tinted with the given color.
    ///
    /// Used as the fallback when a body has no texture file or loading it
    /// failed: hash-based per-pixel variation over latitude bands, enough to
    /// make the spin and tilt of a body readable.
    pub fn surface(gpu: &GpuContext, size: u32, seed: u32, tint: Vec3) -> Self {
        let data = surface_pixels(size, seed, tint);
        Self::from_rgba(gpu, &data, size, size, "Procedural Surface Texture")
    }
}

/// CPU-side pixel generation for [`Texture::surface`].
pub(crate) fn surface_pixels(size: u32, seed: u32, tint: Vec3) -> Vec<u8> {
    let mut data = vec![0u8; (size * size * 4) as usize];
    let base = [
        (tint.x.clamp(0.0, 1.0) * 255.0) as i32,
        (tint.y.clamp(0.0, 1.0) * 255.0) as i32,
        (tint.z.clamp(0.0, 1.0) * 255.0) as i32,
    ];

    for y in 0..size {
        // Darker latitude bands give the sphere visible structure.
        let band = ((y * 6 / size.max(1)) % 2) as i32 * -18;
        for x in 0..size {
            let idx = ((y * size + x) * 4) as usize;
            let variation = ((hash(x, y, seed) % 41) as i32) - 20;

            data[idx] = (base[0] + variation + band).clamp(0, 255) as u8;
            data[idx + 1] = (base[1] + variation + band).clamp(0, 255) as u8;
            data[idx + 2] = (base[2] + variation + band).clamp(0, 255) as u8;
            data[idx + 3] = 255;
        }
    }

    data
}

/// Simple hash function for procedural generation.
fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_add(x.wrapping_mul(374761393));
    h = h.wrapping_add(y.wrapping_mul(668265263));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

/// Errors from assembling a cubemap.
#[derive(Debug)]
pub enum CubemapError {
    /// A face image could not be read or decoded.
    Image(image::ImageError),
    /// A face's dimensions differ from the first face's.
    FaceSizeMismatch {
        face: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },
    /// A face is not square.
    NotSquare { face: usize, size: (u32, u32) },
}

impl std::fmt::Display for CubemapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CubemapError::Image(e) => write!(f, "cubemap face image error: {}", e),
            CubemapError::FaceSizeMismatch {
                face,
                expected,
                got,
            } => write!(
                f,
                "cubemap face {} is {}x{}, expected {}x{}",
                face, got.0, got.1, expected.0, expected.1
            ),
            CubemapError::NotSquare { face, size } => {
                write!(f, "cubemap face {} is {}x{}, not square", face, size.0, size.1)
            }
        }
    }
}

impl std::error::Error for CubemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CubemapError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for CubemapError {
    fn from(e: image::ImageError) -> Self {
        CubemapError::Image(e)
    }
}

/// A six-face cube texture for the skybox.
///
/// Immutable after creation. Faces are ordered +X, -X, +Y, -Y, +Z, -Z to
/// match wgpu's cube view layer order.
#[derive(Debug)]
pub struct Cubemap {
    #[allow(dead_code)]
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    /// Width/height of each face in pixels.
    pub face_size: u32,
}

impl Cubemap {
    /// Composite six equally-sized RGBA faces into one cube texture.
    ///
    /// `faces` holds the raw pixels of each face concatenated in layer
    /// order; each face must be `face_size² · 4` bytes.
    pub fn from_rgba(gpu: &GpuContext, faces: &[Vec<u8>; 6], face_size: u32) -> Self {
        use wgpu::util::DeviceExt;

        let mut data = Vec::with_capacity((face_size * face_size * 4 * 6) as usize);
        for face in faces {
            debug_assert_eq!(face.len(), (face_size * face_size * 4) as usize);
            data.extend_from_slice(face);
        }

        let texture = gpu.device.create_texture_with_data(
            &gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some("Skybox Cubemap"),
                size: wgpu::Extent3d {
                    width: face_size,
                    height: face_size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            face_size,
        }
    }

    /// Load six face images (+X, -X, +Y, -Y, +Z, -Z) and composite them.
    ///
    /// All faces must be square and share the first face's dimensions.
    pub fn from_files(
        gpu: &GpuContext,
        paths: &[impl AsRef<std::path::Path>; 6],
    ) -> Result<Self, CubemapError> {
        let mut faces: Vec<Vec<u8>> = Vec::with_capacity(6);
        let mut face_size = 0u32;

        for (i, path) in paths.iter().enumerate() {
            let img = image::open(path)?.to_rgba8();
            let (width, height) = img.dimensions();
            if width != height {
                return Err(CubemapError::NotSquare {
                    face: i,
                    size: (width, height),
                });
            }
            if i == 0 {
                face_size = width;
            } else if (width, height) != (face_size, face_size) {
                return Err(CubemapError::FaceSizeMismatch {
                    face: i,
                    expected: (face_size, face_size),
                    got: (width, height),
                });
            }
            faces.push(img.into_raw());
        }

        let faces: [Vec<u8>; 6] = faces.try_into().expect("exactly six faces");
        Ok(Self::from_rgba(gpu, &faces, face_size))
    }

    /// Generate a procedural starfield cubemap.
    ///
    /// Deterministic for a given seed; used when no skybox images are
    /// configured or loading them failed.
    pub fn starfield(gpu: &GpuContext, face_size: u32, seed: u32) -> Self {
        let faces = starfield_faces(face_size, seed);
        Self::from_rgba(gpu, &faces, face_size)
    }
}

/// CPU-side pixel generation for [`Cubemap::starfield`]: sparse white-ish
/// stars of varying brightness over near-black space.
pub(crate) fn starfield_faces(face_size: u32, seed: u32) -> [Vec<u8>; 6] {
    std::array::from_fn(|layer| {
        let mut face = vec![0u8; (face_size * face_size * 4) as usize];
        let layer_seed = seed.wrapping_add(layer as u32 * 7919);

        for y in 0..face_size {
            for x in 0..face_size {
                let idx = ((y * face_size + x) * 4) as usize;
                let h = hash(x, y, layer_seed);

                // Roughly one pixel in 300 is a star.
                let (value, blue_shift) = if h % 300 == 0 {
                    let brightness = 120 + (h >> 9) % 136;
                    (brightness as u8, ((h >> 17) % 24) as u8)
                } else {
                    ((h % 7) as u8, 0)
                };

                face[idx] = value.saturating_sub(blue_shift / 2);
                face[idx + 1] = value.saturating_sub(blue_shift / 3);
                face[idx + 2] = value;
                face[idx + 3] = 255;
            }
        }

        face
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_pixels_have_expected_length_and_alpha() {
        let size = 32;
        let data = surface_pixels(size, 7, Vec3::new(0.4, 0.6, 0.9));
        assert_eq!(data.len(), (size * size * 4) as usize);
        for px in data.chunks(4) {
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn surface_pixels_are_deterministic_per_seed() {
        let a = surface_pixels(16, 42, Vec3::ONE);
        let b = surface_pixels(16, 42, Vec3::ONE);
        let c = surface_pixels(16, 43, Vec3::ONE);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn starfield_faces_have_expected_length() {
        let face_size = 64;
        let faces = starfield_faces(face_size, 1);
        for face in &faces {
            assert_eq!(face.len(), (face_size * face_size * 4) as usize);
        }
    }

    #[test]
    fn starfield_faces_differ_and_contain_stars() {
        let faces = starfield_faces(128, 9);
        assert_ne!(faces[0], faces[1]);
        let bright = faces
            .iter()
            .flat_map(|f| f.chunks(4))
            .filter(|px| px[2] > 100)
            .count();
        assert!(bright > 0, "no stars generated");
    }
}
