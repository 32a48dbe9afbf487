//! Ocean surface geometry.
//!
//! The grid is flat; all wave displacement happens in the vertex shader.

mod mesh;

pub use mesh::{GridGeometry, GridMesh, MeshError, Vertex};
