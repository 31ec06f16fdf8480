//! The vertex record shared by every piece of geometry, and the description of how its bytes map
//! onto shader attribute locations.

use std::convert::TryInto;
use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use crate::Error;

/// One vertex as it is laid out in the vertex buffer. The field order is the attribute order the
/// shaders expect:
///
/// ```glsl
/// layout (location = 0) in vec3 aPos;
/// layout (location = 1) in vec4 aColor;
/// layout (location = 2) in vec2 aTex;
/// ```
///
/// Every field is an array of `f32`, so the record is tightly packed with no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
}

/// Numeric type of an attribute's components. Only floats are used by `Vertex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    F32,
}

impl ComponentKind {
    pub fn size(self) -> usize {
        match self {
            ComponentKind::F32 => size_of::<f32>(),
        }
    }
}

/// The arguments of [glVertexAttribPointer](glvertexattribpointer) for one attribute, which tell
/// the driver how to pull that attribute out of the vertex buffer.
///
/// [glvertexattribpointer]: http://docs.gl/gl3/glVertexAttribPointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub kind: ComponentKind,
    /// Bytes between the starts of two consecutive vertices.
    pub stride: usize,
    /// Byte offset of the attribute inside one vertex.
    pub offset: usize,
}

impl VertexAttribute {
    /// Reads this attribute of vertex number `vertex` back out of raw vertex-buffer bytes.
    /// Returns `None` if the bytes end before the attribute does.
    pub fn read(&self, bytes: &[u8], vertex: usize) -> Option<Vec<f32>> {
        let start = vertex * self.stride + self.offset;
        let size = self.kind.size();
        let end = start + self.components as usize * size;
        let attribute = bytes.get(start..end)?;

        Some(attribute
            .chunks_exact(size)
            .map(|c| f32::from_ne_bytes(c.try_into().unwrap_or([0; 4])))
            .collect())
    }
}

impl Vertex {
    pub const STRIDE: usize = size_of::<Vertex>();

    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute { location: 0, components: 3, kind: ComponentKind::F32, stride: Self::STRIDE, offset: 0 },
        VertexAttribute { location: 1, components: 4, kind: ComponentKind::F32, stride: Self::STRIDE, offset: 12 },
        VertexAttribute { location: 2, components: 2, kind: ComponentKind::F32, stride: Self::STRIDE, offset: 28 },
    ];

    pub const fn new(position: [f32; 3], color: [f32; 4], tex_coords: [f32; 2]) -> Self {
        Self { position, color, tex_coords }
    }

    /// Rebuilds vertices from vertex-buffer bytes using only the declared attribute layout.
    pub fn decode(bytes: &[u8]) -> Result<Vec<Vertex>, Error> {
        if bytes.len() % Self::STRIDE != 0 {
            return Err(Error::MisalignedVertexData { len: bytes.len(), stride: Self::STRIDE });
        }

        let misaligned = || Error::MisalignedVertexData { len: bytes.len(), stride: Self::STRIDE };
        let mut vertices = Vec::with_capacity(bytes.len() / Self::STRIDE);

        for n in 0..bytes.len() / Self::STRIDE {
            let [position, color, tex] = &Self::ATTRIBUTES;
            let position = position.read(bytes, n).ok_or_else(misaligned)?;
            let color = color.read(bytes, n).ok_or_else(misaligned)?;
            let tex = tex.read(bytes, n).ok_or_else(misaligned)?;

            vertices.push(Vertex::new(
                [position[0], position[1], position[2]],
                [color[0], color[1], color[2], color[3]],
                [tex[0], tex[1]],
            ));
        }

        Ok(vertices)
    }
}
