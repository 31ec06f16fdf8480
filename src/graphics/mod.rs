//! A small set of wrappers around the OpenGL API.
//!
//! Drawing a shaded, optionally textured, triangle or quad only takes a handful of GL calls, but
//! they are cryptic and `unsafe`, and every object they create has to be deleted by hand exactly
//! once. This module wraps them in a safe interface: [`opengl`] is the only place GL is called,
//! [`gl_types`] owns the objects, and [`resource`] ties a shader program to its geometry.
//!
//! A knowledge of OpenGL is *necessary* to follow any of this. [Learn OpenGL](learnopengl) is the
//! classic set of tutorials and there is [a Rust port of its code](learnopengl-rs).
//!
//! [learnopengl]: https://learnopengl.com/
//! [learnopengl-rs]: https://github.com/bwasty/learn-opengl-rs

pub mod gl_types;
pub mod opengl;
pub mod resource;
pub mod texture;
pub mod utils;

#[cfg(test)]
pub(crate) mod recording;

pub use self::gl_types::{GlBuffer, GlProgram, GlShader, GlTexture, GlVertexArray};
pub use self::opengl::{BufferTarget, GlDevice, NativeGl, ShaderKind};
pub use self::resource::{Constructed, GraphicsResource, Linked, StageSource, Uploaded};
pub use self::texture::DecodedImage;
