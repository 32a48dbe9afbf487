//! Flat, regularly subdivided grid that the wave shader displaces.

use bytemuck::{Pod, Zeroable};
use thiserror::Error;
use wgpu::util::DeviceExt;

/// Vertex data for the grid (position only, everything else comes from uniforms)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("grid needs at least one edge per side")]
    ZeroEdges,

    #[error("{edges_per_side} edges per side needs more vertices than a u32 index can address")]
    TooManyVertices { edges_per_side: u32 },

    #[error("{edges_per_side} edges per side needs more indices than one u32 draw can issue")]
    TooManyIndices { edges_per_side: u32 },

    #[error("{buffer} buffer needs {bytes} bytes, device limit is {limit}")]
    ExceedsBufferLimit {
        buffer: &'static str,
        bytes: u64,
        limit: u64,
    },
}

/// CPU-side grid geometry
///
/// Vertex at (row, col) sits at `(origin + col·Δ, height, origin + row·Δ)` with
/// `Δ = side_length / N` and `origin = -side_length / 2`.
#[derive(Debug, Clone)]
pub struct GridGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl GridGeometry {
    /// Number of vertices for `edges_per_side` subdivisions: (N+1)²
    pub fn vertex_count(edges_per_side: u32) -> u64 {
        let per_side = edges_per_side as u64 + 1;
        per_side * per_side
    }

    /// Number of indices for `edges_per_side` subdivisions: 6·N²
    pub fn index_count(edges_per_side: u32) -> u64 {
        let n = edges_per_side as u64;
        6 * n * n
    }

    /// Reject sizes that would produce an empty grid or overflow u32 indices
    ///
    /// The index count bounds N first: 26754 is the largest N whose 6·N² fits a u32.
    pub fn validate(edges_per_side: u32) -> Result<(), MeshError> {
        if edges_per_side == 0 {
            return Err(MeshError::ZeroEdges);
        }
        if Self::vertex_count(edges_per_side) > u32::MAX as u64 + 1 {
            return Err(MeshError::TooManyVertices { edges_per_side });
        }
        if Self::index_count(edges_per_side) > u32::MAX as u64 {
            return Err(MeshError::TooManyIndices { edges_per_side });
        }
        Ok(())
    }

    /// Build a grid centered on the origin in the XZ plane
    ///
    /// # Arguments
    /// * `side_length` - World-space extent along X and Z
    /// * `edges_per_side` - Subdivision count N (must be > 0)
    /// * `height` - Constant Y of every vertex
    pub fn new(side_length: f64, edges_per_side: u32, height: f64) -> Result<Self, MeshError> {
        Self::validate(edges_per_side)?;

        let n = edges_per_side as usize;
        let stride = n + 1;
        let delta = side_length / edges_per_side as f64;
        let origin = -side_length / 2.0;

        let mut vertices = Vec::with_capacity(stride * stride);
        for row in 0..=n {
            for col in 0..=n {
                vertices.push(Vertex {
                    position: [
                        (origin + delta * col as f64) as f32,
                        height as f32,
                        (origin + delta * row as f64) as f32,
                    ],
                });
            }
        }

        // Two triangles per cell sharing the (top_left + 1, top_left + stride) edge
        let stride = stride as u32;
        let mut indices = Vec::with_capacity(6 * n * n);
        for row in 0..edges_per_side {
            for col in 0..edges_per_side {
                let top_left = row * stride + col;
                indices.extend_from_slice(&[
                    top_left,
                    top_left + stride,
                    top_left + 1,
                    top_left + 1,
                    top_left + stride,
                    top_left + stride + 1,
                ]);
            }
        }

        Ok(Self { vertices, indices })
    }

    pub fn vertex_bytes(&self) -> u64 {
        std::mem::size_of_val(self.vertices.as_slice()) as u64
    }

    pub fn index_bytes(&self) -> u64 {
        std::mem::size_of_val(self.indices.as_slice()) as u64
    }
}

/// Grid geometry uploaded to GPU vertex/index buffers
pub struct GridMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GridMesh {
    /// Generate the grid and upload it
    ///
    /// Fails before allocating anything on the GPU if either buffer would exceed
    /// the device's `max_buffer_size`.
    pub fn new(
        device: &wgpu::Device,
        side_length: f64,
        edges_per_side: u32,
        height: f64,
    ) -> Result<Self, MeshError> {
        GridGeometry::validate(edges_per_side)?;

        let limit = device.limits().max_buffer_size;
        let vertex_bytes =
            GridGeometry::vertex_count(edges_per_side) * std::mem::size_of::<Vertex>() as u64;
        let index_bytes =
            GridGeometry::index_count(edges_per_side) * std::mem::size_of::<u32>() as u64;
        for (buffer, bytes) in [("vertex", vertex_bytes), ("index", index_bytes)] {
            if bytes > limit {
                return Err(MeshError::ExceedsBufferLimit {
                    buffer,
                    bytes,
                    limit,
                });
            }
        }

        let geometry = GridGeometry::new(side_length, edges_per_side, height)?;
        log::info!(
            "Grid mesh: {} vertices, {} indices ({:.1} MB)",
            geometry.vertices.len(),
            geometry.indices.len(),
            (geometry.vertex_bytes() + geometry.index_bytes()) as f64 / (1024.0 * 1024.0)
        );

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        })
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Issue an indexed triangle-list draw of the whole grid
    ///
    /// Expects the caller to have bound a program whose pipeline uses [`Vertex::layout`].
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

impl Drop for GridMesh {
    fn drop(&mut self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
