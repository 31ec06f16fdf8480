use std::str::FromStr;

use crate::vertex::Vertex;
use crate::Error;

/// Static geometry: a list of vertices and, optionally, a list of indices into it. With indices,
/// each group of three indices is one triangle; without them, each group of three vertices is.
///
/// Every index is checked against the vertex count when the geometry is built, so anything that
/// gets to the GPU is known to be in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices, indices: None }
    }

    pub fn indexed(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, Error> {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(Error::IndexOutOfRange { index, vertex_count: vertices.len() });
        }

        Ok(Self { vertices, indices: Some(indices) })
    }

    /// The single-triangle variant: one red, one green and one blue corner.
    pub fn triangle() -> Self {
        Self::new(vec![
            Vertex::new([0.0, 0.5, 0.0], [1.0, 0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([0.5, -0.5, 0.0], [0.0, 1.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([-0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0], [0.0, 1.0]),
        ])
    }

    /// A unit quad centered on the origin, drawn as two triangles that share the 0-2 diagonal.
    pub fn quad() -> Self {
        Self {
            vertices: vec![
                Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0, 1.0], [0.0, 1.0]),
                Vertex::new([-0.5, 0.5, 0.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0]),
                Vertex::new([0.5, 0.5, 0.0], [0.0, 0.0, 1.0, 1.0], [1.0, 0.0]),
                Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, 1.0, 1.0], [1.0, 1.0]),
            ],
            indices: Some(vec![
                0, 1, 2,
                2, 3, 0,
            ]),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of elements a single draw call has to cover: the index count if there are indices,
    /// otherwise the vertex count.
    pub fn draw_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertices.len(),
        }
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_ref().map(|indices| bytemuck::cast_slice(indices.as_slice()))
    }

    /// The triangles this geometry draws, in draw order. A trailing group of fewer than three
    /// elements is not a triangle and is left out.
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        let order: Vec<u32> = match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.vertices.len() as u32).collect(),
        };

        order.chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect()
    }
}

/// The built-in geometry sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Triangle,
    Quad,
}

impl Shape {
    pub fn geometry(self) -> Geometry {
        match self {
            Shape::Triangle => Geometry::triangle(),
            Shape::Quad => Geometry::quad(),
        }
    }
}

impl FromStr for Shape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "triangle" => Ok(Shape::Triangle),
            "quad" => Ok(Shape::Quad),
            _ => Err(Error::UnknownShape(s.to_string())),
        }
    }
}
