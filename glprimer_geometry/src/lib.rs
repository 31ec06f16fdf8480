//! CPU-side data for glprimer: the vertex record and its attribute layout, validated geometry
//! and pixel formats. Nothing in here talks to the graphics driver, so all of it can be tested
//! without a context.

pub mod mesh;
pub mod pixel;
pub mod vertex;

pub use mesh::{Geometry, Shape};
pub use pixel::PixelFormat;
pub use vertex::{ComponentKind, Vertex, VertexAttribute};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("unsupported pixel format: {channels} channels (expected 3 or 4)")]
    UnsupportedPixelFormat { channels: u8 },

    #[error("vertex data of {len} bytes is not a whole number of {stride}-byte vertices")]
    MisalignedVertexData { len: usize, stride: usize },

    #[error("unknown shape \"{0}\" (expected \"triangle\" or \"quad\")")]
    UnknownShape(String),
}
