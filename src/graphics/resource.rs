//! A shader program bound to a piece of static geometry.
//!
//! A [`GraphicsResource`] goes through three states, each its own type:
//!
//! - [`Constructed`]: both shader sources have been read and the geometry is in hand. Nothing has
//!   been allocated on the GPU yet.
//! - [`Linked`]: both stages compiled and linked into a program.
//! - [`Uploaded`]: vertex (and index) data live in GPU buffers described by a vertex array. Only
//!   now can the resource be drawn, any number of times.
//!
//! Each transition consumes the previous state, so drawing before upload doesn't compile, and
//! neither does using a resource after [`GraphicsResource::release`].

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::fs;

use geometry::{Geometry, Vertex};
use gl::types::*;

use crate::error::{GlError, Result};

use super::gl_types::{GlBuffer, GlProgram, GlShader, GlVertexArray};
use super::opengl::{unbind_buffers, BufferTarget, GlDevice, ShaderKind};

/// The source text of one shader stage, as read from disk.
///
/// A file that can't be read leaves the text empty and keeps the error. The stage will then fail to
/// compile, which is where the error surfaces.
#[derive(Debug)]
pub struct StageSource {
    kind: ShaderKind,
    path: PathBuf,
    text: String,
    error: Option<GlError>,
}

impl StageSource {
    pub fn read<P: AsRef<Path>>(kind: ShaderKind, path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!("read {} shader from {}", kind, path.display());
                Self { kind, path, text, error: None }
            },

            Err(source) => {
                let error = GlError::Io { path: path.clone(), source };
                error!("{}", error);
                Self { kind, path, text: String::new(), error: Some(error) }
            }
        }
    }

    pub fn kind(&self) -> ShaderKind { self.kind }

    pub fn path(&self) -> &Path { &self.path }

    pub fn text(&self) -> &str { &self.text }

    /// The error recorded when the file could not be read.
    pub fn error(&self) -> Option<&GlError> { self.error.as_ref() }
}

/// Compiles one shader stage.
///
/// GL creates the shader object whether or not compilation succeeds, so the status has to be
/// checked explicitly. On failure the object is deleted and the driver's log (at most 511 bytes)
/// is returned in the error.
pub fn compile_stage<D: GlDevice>(device: &Rc<D>, kind: ShaderKind, source: &str) -> Result<GlShader<D>> {
    let shader = GlShader::create(Rc::clone(device), kind);
    device.shader_source(shader.id(), source);
    device.compile_shader(shader.id());

    if !device.shader_compiled(shader.id()) {
        let log = device.shader_info_log(shader.id());
        error!("error compiling {} shader: {}", kind, log);
        return Err(GlError::ShaderCompile { kind, log });
    }

    Ok(shader)
}

/// Links already-compiled stages into a program. The stages are detached afterwards, but stay
/// alive until their owners drop them.
pub fn link_program<D: GlDevice>(device: &Rc<D>, shaders: &[&GlShader<D>]) -> Result<GlProgram<D>> {
    let program = GlProgram::create(Rc::clone(device));

    for shader in shaders {
        device.attach_shader(program.id(), shader.id());
    }

    device.link_program(program.id());

    if !device.program_linked(program.id()) {
        let log = device.program_info_log(program.id());
        error!("error linking shader program: {}", log);
        return Err(GlError::ShaderLink { log });
    }

    for shader in shaders {
        device.detach_shader(program.id(), shader.id());
    }

    Ok(program)
}

/// Sources read, nothing on the GPU.
#[derive(Debug)]
pub struct Constructed;

/// Program linked, geometry still only on the CPU.
#[derive(Debug)]
pub struct Linked<D: GlDevice> {
    program: GlProgram<D>,
}

/// Everything on the GPU. The field order is the release order: vertex array, buffers, program.
#[derive(Debug)]
pub struct Uploaded<D: GlDevice> {
    vertex_array: GlVertexArray<D>,
    vertex_buffer: GlBuffer<D>,
    index_buffer: Option<GlBuffer<D>>,
    program: GlProgram<D>,
}

#[derive(Debug)]
pub struct GraphicsResource<D: GlDevice, S> {
    device: Rc<D>,
    geometry: Geometry,
    vertex: StageSource,
    fragment: StageSource,
    state: S,
}

impl<D: GlDevice, S> GraphicsResource<D, S> {
    pub fn geometry(&self) -> &Geometry { &self.geometry }

    pub fn vertex_source(&self) -> &StageSource { &self.vertex }

    pub fn fragment_source(&self) -> &StageSource { &self.fragment }

    /// Errors recorded while reading the shader sources.
    pub fn source_errors(&self) -> impl Iterator<Item = &GlError> {
        self.vertex.error().into_iter().chain(self.fragment.error())
    }

    fn into_state<T>(self, state: T) -> (S, GraphicsResource<D, T>) {
        let GraphicsResource { device, geometry, vertex, fragment, state: old } = self;
        (old, GraphicsResource { device, geometry, vertex, fragment, state })
    }
}

impl<D: GlDevice> GraphicsResource<D, Constructed> {
    /// Reads both shader sources and takes ownership of the geometry. Unreadable sources are
    /// logged and recorded, not fatal; see [`StageSource`].
    pub fn new<P, Q>(device: Rc<D>, vertex_path: P, fragment_path: Q, geometry: Geometry) -> Self
        where P: AsRef<Path>, Q: AsRef<Path>
    {
        let vertex = StageSource::read(ShaderKind::Vertex, vertex_path);
        let fragment = StageSource::read(ShaderKind::Fragment, fragment_path);

        Self { device, geometry, vertex, fragment, state: Constructed }
    }

    /// Compiles both stages and links them. The stage objects are deleted when this returns,
    /// whether or not linking worked; the program keeps what it needs.
    pub fn link(self) -> Result<GraphicsResource<D, Linked<D>>> {
        let vertex = compile_stage(&self.device, ShaderKind::Vertex, self.vertex.text())?;
        let fragment = compile_stage(&self.device, ShaderKind::Fragment, self.fragment.text())?;
        let program = link_program(&self.device, &[&vertex, &fragment])?;

        info!("linked shader program {} ({} + {})",
              program.id(), self.vertex.path().display(), self.fragment.path().display());

        Ok(self.into_state(Linked { program }).1)
    }
}

impl<D: GlDevice> GraphicsResource<D, Linked<D>> {
    pub fn program(&self) -> &GlProgram<D> { &self.state.program }

    /// Moves the geometry to the GPU in one static upload and declares the vertex layout. The CPU
    /// copy is kept.
    pub fn upload(self) -> GraphicsResource<D, Uploaded<D>> {
        let device = Rc::clone(&self.device);

        let vertex_array = GlVertexArray::generate(Rc::clone(&device));
        vertex_array.bind();

        let vertex_buffer = GlBuffer::init(Rc::clone(&device), BufferTarget::Array, self.geometry.vertex_bytes());

        // The element buffer binding is part of the vertex array's state, so it stays bound
        let index_buffer = self.geometry
            .index_bytes()
            .map(|bytes| GlBuffer::init(Rc::clone(&device), BufferTarget::Element, bytes));

        for attribute in Vertex::ATTRIBUTES.iter() {
            vertex_array.set_attribute(attribute);
        }

        vertex_array.unbind();
        unbind_buffers(&*device, BufferTarget::Array);

        debug!("uploaded {} vertices ({} bytes) and {} indices",
               self.geometry.vertex_count(), vertex_buffer.len(),
               self.geometry.indices().map_or(0, |i| i.len()));

        let (Linked { program }, resource) = self.into_state(());
        resource.into_state(Uploaded { vertex_array, vertex_buffer, index_buffer, program }).1
    }
}

impl<D: GlDevice> GraphicsResource<D, Uploaded<D>> {
    pub fn program(&self) -> &GlProgram<D> { &self.state.program }

    pub fn vertex_array(&self) -> &GlVertexArray<D> { &self.state.vertex_array }

    pub fn vertex_buffer(&self) -> &GlBuffer<D> { &self.state.vertex_buffer }

    pub fn index_buffer(&self) -> Option<&GlBuffer<D>> { self.state.index_buffer.as_ref() }

    /// Uses the program, binds the vertex array and issues one draw call over the whole geometry.
    /// Nothing is unbound afterwards.
    pub fn draw(&self) {
        self.state.program.set_used();
        self.state.vertex_array.bind();

        let count = self.geometry.draw_count() as GLsizei;
        match self.state.index_buffer {
            Some(_) => self.device.draw_elements(count),
            None => self.device.draw_arrays(0, count),
        }
    }

    /// Deletes the vertex array, the buffers and the program, in that order.
    pub fn release(self) {
        let Uploaded { mut vertex_array, mut vertex_buffer, mut index_buffer, mut program } = self.state;

        vertex_array.release();
        vertex_buffer.release();
        if let Some(buffer) = index_buffer.as_mut() {
            buffer.release();
        }
        program.release();

        debug!("released graphics resource");
    }
}
