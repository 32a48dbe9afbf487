//! Named uniform slots reflected from WGSL, and the CPU-side block they are written into.
//!
//! Each program has one uniform block at `@group(0) @binding(0)`. Its struct members are the
//! "uniforms": `set(name, value)` resolves the member by name and writes the value at the
//! member's offset. Names the program does not declare resolve to nothing and the write is
//! dropped, so callers can push one superset of uniforms to every program.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};
use naga::{AddressSpace, Module, ScalarKind, TypeInner, VectorSize};
use thiserror::Error;

/// Types a uniform member can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Int,
    Uint,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    /// Bytes written for a value of this kind
    pub fn size(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int | UniformKind::Uint => 4,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }

    fn from_naga(inner: &TypeInner) -> Option<Self> {
        match *inner {
            TypeInner::Scalar(scalar) if scalar.width == 4 => match scalar.kind {
                ScalarKind::Float => Some(UniformKind::Float),
                ScalarKind::Sint => Some(UniformKind::Int),
                ScalarKind::Uint => Some(UniformKind::Uint),
                _ => None,
            },
            TypeInner::Vector { size, scalar }
                if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
            {
                match size {
                    VectorSize::Tri => Some(UniformKind::Vec3),
                    VectorSize::Quad => Some(UniformKind::Vec4),
                    VectorSize::Bi => None,
                }
            }
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar,
            } if scalar.kind == ScalarKind::Float && scalar.width == 4 => Some(UniformKind::Mat4),
            _ => None,
        }
    }
}

/// Location of one named uniform inside the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub offset: u32,
    pub kind: UniformKind,
}

impl UniformSlot {
    fn end(&self) -> u32 {
        self.offset + self.kind.size() as u32
    }

    fn overlaps(&self, other: &UniformSlot) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// A value that can be pushed to a uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Uint(u32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    fn type_name(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) => "i32",
            UniformValue::Uint(_) => "u32",
            UniformValue::Float(_) => "f32",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<u32> for UniformValue {
    fn from(value: u32) -> Self {
        UniformValue::Uint(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<Vec4> for UniformValue {
    fn from(value: Vec4) -> Self {
        UniformValue::Vec4(value)
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UniformError {
    #[error("no uniform named `{0}`")]
    NotFound(String),

    #[error("uniform `{name}` is {expected:?}, cannot store a {found}")]
    TypeMismatch {
        name: String,
        expected: UniformKind,
        found: &'static str,
    },

    #[error("uniform `{name}` is declared differently by the vertex and fragment stages")]
    StageMismatch { name: String },

    #[error("uniforms `{first}` and `{second}` overlap in the uniform block")]
    Overlap { first: String, second: String },
}

/// Name → slot map for a program's uniform block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformLayout {
    slots: HashMap<String, UniformSlot>,
    size: u32,
}

impl UniformLayout {
    /// Reflect the `@group(0) @binding(0)` uniform block of one module
    ///
    /// Returns an empty layout when the module declares no such block.
    pub fn from_module(module: &Module) -> Self {
        let block = module.global_variables.iter().find(|(_, var)| {
            var.space == AddressSpace::Uniform
                && var
                    .binding
                    .as_ref()
                    .is_some_and(|b| b.group == 0 && b.binding == 0)
        });
        let Some((_, var)) = block else {
            return Self::default();
        };

        let mut layout = Self::default();
        match &module.types[var.ty].inner {
            TypeInner::Struct { members, span } => {
                layout.size = *span;
                for member in members {
                    let Some(name) = &member.name else { continue };
                    match UniformKind::from_naga(&module.types[member.ty].inner) {
                        Some(kind) => {
                            layout.slots.insert(
                                name.clone(),
                                UniformSlot {
                                    offset: member.offset,
                                    kind,
                                },
                            );
                        }
                        None => log::debug!("Uniform `{name}` has an unsupported type, skipped"),
                    }
                }
            }
            inner => {
                // A bare (non-struct) uniform is addressed by the variable's own name
                if let (Some(name), Some(kind)) = (&var.name, UniformKind::from_naga(inner)) {
                    layout.size = kind.size() as u32;
                    layout
                        .slots
                        .insert(name.clone(), UniformSlot { offset: 0, kind });
                }
            }
        }
        layout
    }

    /// Combine the vertex and fragment blocks, which share one buffer
    pub fn merge(vertex: Self, fragment: Self) -> Result<Self, UniformError> {
        let mut merged = vertex;
        for (name, slot) in fragment.slots {
            match merged.slots.get(&name) {
                Some(existing) if *existing != slot => {
                    return Err(UniformError::StageMismatch { name });
                }
                Some(_) => {}
                None => {
                    merged.slots.insert(name, slot);
                }
            }
        }
        merged.size = merged.size.max(fragment.size);

        let mut ordered: Vec<(&String, &UniformSlot)> = merged.slots.iter().collect();
        ordered.sort_by_key(|(_, slot)| slot.offset);
        for pair in ordered.windows(2) {
            let ((first, a), (second, b)) = (pair[0], pair[1]);
            if a.overlaps(b) {
                return Err(UniformError::Overlap {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
        Ok(merged)
    }

    /// Reflect and merge both stages straight from WGSL source
    pub fn reflect_wgsl(vertex_src: &str, fragment_src: &str) -> Result<Self, String> {
        let vertex =
            naga::front::wgsl::parse_str(vertex_src).map_err(|e| e.emit_to_string(vertex_src))?;
        let fragment = naga::front::wgsl::parse_str(fragment_src)
            .map_err(|e| e.emit_to_string(fragment_src))?;
        Self::merge(Self::from_module(&vertex), Self::from_module(&fragment))
            .map_err(|e| e.to_string())
    }

    pub fn slot(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Size of the block as declared by the shader
    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Anything uniforms can be pushed into
///
/// `set` never fails: a name the receiver does not know is ignored.
pub trait UniformSink {
    fn set<V: Into<UniformValue>>(&mut self, name: &str, value: V);
}

/// CPU copy of a uniform block, uploaded when dirty
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    data: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        // Uniform bindings must be non-empty and 16-byte sized
        let size = (layout.size.max(16) as usize).next_multiple_of(16);
        Self {
            layout,
            data: vec![0; size],
            dirty: true,
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Write a value into the named slot
    ///
    /// Bytes outside the slot are never touched, and nothing is touched on error.
    pub fn write(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let slot = *self
            .layout
            .slot(name)
            .ok_or_else(|| UniformError::NotFound(name.to_string()))?;
        let start = slot.offset as usize;
        let dst = &mut self.data[start..start + slot.kind.size()];

        match (slot.kind, value) {
            (UniformKind::Float, UniformValue::Float(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&v))
            }
            (UniformKind::Int, UniformValue::Int(v)) => dst.copy_from_slice(bytemuck::bytes_of(&v)),
            (UniformKind::Int, UniformValue::Bool(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&(v as i32)))
            }
            (UniformKind::Uint, UniformValue::Uint(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&v))
            }
            (UniformKind::Uint, UniformValue::Bool(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&(v as u32)))
            }
            (UniformKind::Vec3, UniformValue::Vec3(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&v.to_array()))
            }
            (UniformKind::Vec4, UniformValue::Vec4(v)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&v.to_array()))
            }
            (UniformKind::Mat4, UniformValue::Mat4(m)) => {
                dst.copy_from_slice(bytemuck::bytes_of(&m.to_cols_array()))
            }
            (expected, value) => {
                return Err(UniformError::TypeMismatch {
                    name: name.to_string(),
                    expected,
                    found: value.type_name(),
                })
            }
        }
        self.dirty = true;
        Ok(())
    }
}

impl UniformSink for UniformBlock {
    fn set<V: Into<UniformValue>>(&mut self, name: &str, value: V) {
        match self.write(name, value.into()) {
            Ok(()) | Err(UniformError::NotFound(_)) => {}
            Err(err) => log::trace!("Uniform write dropped: {err}"),
        }
    }
}
