//! Cube-mapped sky drawn behind everything else.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use wgpu::util::DeviceExt;

/// Face images in cube layer order: +X, -X, +Y, -Y, +Z, -Z
pub const FACE_FILES: [&str; 6] = [
    "right.bmp",
    "left.bmp",
    "top.bmp",
    "bottom.bmp",
    "front.bmp",
    "back.bmp",
];

/// Colour of faces that could not be loaded
pub const PLACEHOLDER_RGBA: [u8; 4] = [118, 154, 196, 255];

/// Unit cube as 36 positions, two triangles per face
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

/// Six square RGBA faces of equal size
#[derive(Debug, Clone)]
pub struct CubemapFaces {
    size: u32,
    faces: Vec<RgbaImage>,
}

impl CubemapFaces {
    /// Load the six faces from `dir`
    ///
    /// Never fails: unreadable or mismatched faces are logged and replaced by a
    /// solid placeholder, so a missing sky only degrades the picture.
    pub fn load(dir: &Path) -> Self {
        let loaded = FACE_FILES
            .iter()
            .map(|file| {
                let path = dir.join(file);
                let image = image::open(&path)
                    .map(|img| img.to_rgba8())
                    .map_err(|e| e.to_string());
                (path, image)
            })
            .collect();
        Self::from_loaded(loaded)
    }

    /// Assemble faces from per-file load results
    ///
    /// The first square face that loaded sets the cube size.
    pub fn from_loaded(loaded: Vec<(PathBuf, Result<RgbaImage, String>)>) -> Self {
        let size = loaded
            .iter()
            .filter_map(|(_, image)| image.as_ref().ok())
            .find(|image| image.width() == image.height() && image.width() > 0)
            .map_or(1, |image| image.width());

        let mut faces: Vec<RgbaImage> = loaded
            .into_iter()
            .map(|(path, image)| match image {
                Ok(image) if image.width() == size && image.height() == size => image,
                Ok(image) => {
                    log::warn!(
                        "Skybox face {} is {}x{}, expected {size}x{size}; using placeholder",
                        path.display(),
                        image.width(),
                        image.height()
                    );
                    placeholder(size)
                }
                Err(err) => {
                    log::warn!(
                        "Failed to load skybox face {}: {err}; using placeholder",
                        path.display()
                    );
                    placeholder(size)
                }
            })
            .collect();
        faces.resize_with(FACE_FILES.len(), || placeholder(size));
        faces.truncate(FACE_FILES.len());

        Self { size, faces }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn faces(&self) -> &[RgbaImage] {
        &self.faces
    }

    /// All face pixels, one layer after another
    pub fn to_bytes(&self) -> Vec<u8> {
        self.faces
            .iter()
            .flat_map(|face| face.as_raw().iter().copied())
            .collect()
    }
}

fn placeholder(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, image::Rgba(PLACEHOLDER_RGBA))
}

/// Cube texture and geometry for the sky
pub struct Skybox {
    vertex_buffer: wgpu::Buffer,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl Skybox {
    pub const TEXTURE_BINDING: u32 = 0;
    pub const SAMPLER_BINDING: u32 = 1;
    /// Every binding in the group 1 layout
    pub const BINDINGS: [u32; 2] = [Self::TEXTURE_BINDING, Self::SAMPLER_BINDING];

    /// Layout of the cube texture and sampler, bound at group 1
    pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: Self::TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: Self::SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &CubemapFaces,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Skybox Cubemap"),
                size: wgpu::Extent3d {
                    width: faces.size(),
                    height: faces.size(),
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
            &faces.to_bytes(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Skybox Cubemap View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Skybox Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: Self::TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: Self::SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!("Skybox cubemap: 6 x {0}x{0}", faces.size());

        Self {
            vertex_buffer,
            texture,
            bind_group,
        }
    }

    /// Draw the cube; the skybox program must already be in use
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..CUBE_POSITIONS.len() as u32, 0..1);
    }
}

impl Drop for Skybox {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.texture.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(size, size, image::Rgba([value, value, value, 255]))
    }

    fn loaded(images: Vec<Result<RgbaImage, String>>) -> Vec<(PathBuf, Result<RgbaImage, String>)> {
        FACE_FILES
            .iter()
            .map(PathBuf::from)
            .zip(images)
            .collect()
    }

    #[test]
    fn test_all_faces_loaded_in_order() {
        let faces = CubemapFaces::from_loaded(loaded((0..6).map(|i| Ok(solid(4, i))).collect()));

        assert_eq!(faces.size(), 4);
        assert_eq!(faces.faces().len(), 6);
        for (i, face) in faces.faces().iter().enumerate() {
            assert_eq!(face.get_pixel(0, 0)[0], i as u8);
        }
        assert_eq!(faces.to_bytes().len(), 6 * 4 * 4 * 4);
    }

    #[test]
    fn test_missing_face_becomes_placeholder() {
        let mut images: Vec<_> = (0..6).map(|_| Ok(solid(8, 10))).collect();
        images[2] = Err("file not found".into());

        let faces = CubemapFaces::from_loaded(loaded(images));

        assert_eq!(faces.size(), 8);
        assert_eq!(faces.faces()[2].get_pixel(3, 3).0, PLACEHOLDER_RGBA);
        assert_eq!(faces.faces()[3].get_pixel(3, 3).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_mismatched_face_becomes_placeholder() {
        let mut images: Vec<_> = (0..6).map(|_| Ok(solid(8, 10))).collect();
        images[5] = Ok(RgbaImage::new(8, 4));

        let faces = CubemapFaces::from_loaded(loaded(images));

        assert_eq!(faces.faces()[5].dimensions(), (8, 8));
        assert_eq!(faces.faces()[5].get_pixel(0, 0).0, PLACEHOLDER_RGBA);
    }

    #[test]
    fn test_nothing_loaded_gives_unit_placeholder_cube() {
        let faces = CubemapFaces::load(Path::new("no/such/skybox/dir"));

        assert_eq!(faces.size(), 1);
        assert_eq!(faces.faces().len(), 6);
        assert!(faces
            .faces()
            .iter()
            .all(|face| face.get_pixel(0, 0).0 == PLACEHOLDER_RGBA));
    }

    #[test]
    fn test_cube_spans_unit_extent() {
        assert!(CUBE_POSITIONS
            .iter()
            .flatten()
            .all(|c| c.abs() == 1.0));
        for axis in 0..3 {
            for sign in [-1.0, 1.0] {
                let count = CUBE_POSITIONS.iter().filter(|p| p[axis] == sign).count();
                // Each face contributes 6 vertices, adjacent faces 12 more
                assert!(count >= 6, "axis {axis} sign {sign}");
            }
        }
    }
}
