//! Owning wrappers around OpenGL object names.
//!
//! OpenGL hands out objects as bare integers and leaves it to you to delete each one exactly once.
//! Every type in here owns exactly one such name. None of them are `Clone` or `Copy`, so an object
//! can be moved but never duplicated, and each one deletes its object when it is released or
//! dropped, whichever happens first. Releasing twice is harmless: the name is taken out on the
//! first release and there is nothing left to delete the second time.
//!
//! If you're new to any of this, [Learn OpenGL](learnopengl) covers what each object is for.
//!
//! [learnopengl]: https://learnopengl.com/

use std::fmt;
use std::rc::Rc;

use gl::types::*;

use geometry::{PixelFormat, VertexAttribute};

use super::opengl::{BufferTarget, GlDevice, ShaderKind};

/// One GL name plus the call that deletes it.
struct GlObject<D: GlDevice> {
    device: Rc<D>,
    id: Option<GLuint>,
    delete: fn(&D, GLuint),
}

impl<D: GlDevice> GlObject<D> {
    fn new(device: Rc<D>, id: GLuint, delete: fn(&D, GLuint)) -> Self {
        Self { device, id: Some(id), delete }
    }

    /// 0, GL's "no object", once released.
    fn id(&self) -> GLuint {
        self.id.unwrap_or(0)
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            (self.delete)(&*self.device, id);
        }
    }
}

impl<D: GlDevice> Drop for GlObject<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: GlDevice> fmt::Debug for GlObject<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.id)
    }
}

/// Represents a compiled shader stage. Once it has been linked into a [`GlProgram`] the program
/// keeps its own copy, so stages are short-lived.
#[derive(Debug)]
pub struct GlShader<D: GlDevice> {
    object: GlObject<D>,
    kind: ShaderKind,
}

impl<D: GlDevice> GlShader<D> {
    pub(super) fn create(device: Rc<D>, kind: ShaderKind) -> Self {
        let id = device.create_shader(kind);
        Self { object: GlObject::new(device, id, D::delete_shader), kind }
    }

    pub fn id(&self) -> GLuint { self.object.id() }

    pub fn kind(&self) -> ShaderKind { self.kind }

    pub fn release(&mut self) {
        self.object.release();
    }
}

/// Represents the graphics pipeline: a set of shader stages linked together.
#[derive(Debug)]
pub struct GlProgram<D: GlDevice> {
    object: GlObject<D>,
}

impl<D: GlDevice> GlProgram<D> {
    pub(super) fn create(device: Rc<D>) -> Self {
        let id = device.create_program();
        Self { object: GlObject::new(device, id, D::delete_program) }
    }

    pub fn id(&self) -> GLuint { self.object.id() }

    pub fn set_used(&self) {
        self.object.device.use_program(self.id());
    }

    /// Uses the program and sets a `bool` uniform. Unknown names are ignored, like in GL.
    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as GLint);
    }

    /// Uses the program and sets an `int` (or sampler) uniform.
    pub fn set_int(&self, name: &str, value: GLint) {
        let device = &self.object.device;
        let location = device.uniform_location(self.id(), name);
        if location < 0 {
            debug!("program {} has no uniform \"{}\"", self.id(), name);
            return;
        }

        self.set_used();
        device.uniform_1i(location, value);
    }

    /// Uses the program and sets a `float` uniform.
    pub fn set_float(&self, name: &str, value: GLfloat) {
        let device = &self.object.device;
        let location = device.uniform_location(self.id(), name);
        if location < 0 {
            debug!("program {} has no uniform \"{}\"", self.id(), name);
            return;
        }

        self.set_used();
        device.uniform_1f(location, value);
    }

    pub fn release(&mut self) {
        self.object.release();
    }
}

/// Represents a vertex array object (VAO), which records how the bound buffers are read: which
/// buffer feeds which attribute location, with what layout, and which element buffer to index.
#[derive(Debug)]
pub struct GlVertexArray<D: GlDevice> {
    object: GlObject<D>,
}

impl<D: GlDevice> GlVertexArray<D> {
    pub fn generate(device: Rc<D>) -> Self {
        let id = device.gen_vertex_array();
        Self { object: GlObject::new(device, id, D::delete_vertex_array) }
    }

    pub fn id(&self) -> GLuint { self.object.id() }

    pub fn bind(&self) {
        self.object.device.bind_vertex_array(self.id());
    }

    pub fn unbind(&self) {
        self.object.device.bind_vertex_array(0);
    }

    /// Declares one attribute of the currently bound array buffer. The array has to be bound.
    pub fn set_attribute(&self, attribute: &VertexAttribute) {
        let device = &self.object.device;
        device.vertex_attrib_pointer(attribute);
        device.enable_vertex_attrib_array(attribute.location);
    }

    pub fn release(&mut self) {
        self.object.release();
    }
}

/// Represents a buffer object. With [`BufferTarget::Array`] it is a [vertex buffer object
/// (VBO)](vbo) holding vertex data; with [`BufferTarget::Element`] it is an element buffer object
/// (EBO), a list of vertex indices that lets shared vertices be stored once.
///
/// [vbo]: https://en.wikipedia.org/wiki/Vertex_buffer_object
#[derive(Debug)]
pub struct GlBuffer<D: GlDevice> {
    object: GlObject<D>,
    target: BufferTarget,
    len: usize,
}

impl<D: GlDevice> GlBuffer<D> {
    /// Generates a buffer, binds it to `target` and uploads `data` in one static transfer.
    pub fn init(device: Rc<D>, target: BufferTarget, data: &[u8]) -> Self {
        let mut buffer = Self::generate(device, target);
        buffer.bind();
        buffer.object.device.buffer_data(target, data);
        buffer.len = data.len();
        buffer
    }

    pub fn generate(device: Rc<D>, target: BufferTarget) -> Self {
        let id = device.gen_buffer();
        Self { object: GlObject::new(device, id, D::delete_buffer), target, len: 0 }
    }

    pub fn id(&self) -> GLuint { self.object.id() }

    pub fn target(&self) -> BufferTarget { self.target }

    /// Bytes uploaded by [`GlBuffer::init`].
    pub fn len(&self) -> usize { self.len }

    pub fn bind(&self) {
        self.object.device.bind_buffer(self.target, self.id());
    }

    pub fn release(&mut self) {
        self.object.release();
    }
}

/// "Texture" is the OpenGL term for an image passed to the graphics pipeline. In the fragment
/// shader a texture can be sampled and its pixel data applied to the fragments being drawn.
/// Loading lives in [`super::texture`].
#[derive(Debug)]
pub struct GlTexture<D: GlDevice> {
    object: GlObject<D>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl<D: GlDevice> GlTexture<D> {
    pub(super) fn generate(device: Rc<D>, width: u32, height: u32, format: PixelFormat) -> Self {
        let id = device.gen_texture();
        Self { object: GlObject::new(device, id, D::delete_texture), width, height, format }
    }

    pub(super) fn device(&self) -> &D {
        &self.object.device
    }

    pub fn id(&self) -> GLuint { self.object.id() }

    pub fn width(&self) -> u32 { self.width }

    pub fn height(&self) -> u32 { self.height }

    pub fn format(&self) -> PixelFormat { self.format }

    /// Makes `unit` the active texture unit and binds this texture to it.
    pub fn bind(&self, unit: GLuint) {
        let device = &self.object.device;
        device.active_texture(unit);
        device.bind_texture(self.id());
    }

    pub fn release(&mut self) {
        self.object.release();
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::graphics::recording::{Call, RecordingGl};

    #[test]
    fn releasing_twice_deletes_once() {
        let device = Rc::new(RecordingGl::new());
        let mut buffer = GlBuffer::init(Rc::clone(&device), BufferTarget::Array, &[1, 2, 3, 4]);
        let id = buffer.id();

        buffer.release();
        buffer.release();
        drop(buffer);

        assert_eq!(device.count(|c| *c == Call::DeleteBuffer(id)), 1);
    }

    #[test]
    fn released_handle_reports_no_object() {
        let device = Rc::new(RecordingGl::new());
        let mut vertex_array = GlVertexArray::generate(Rc::clone(&device));
        assert_ne!(vertex_array.id(), 0);

        vertex_array.release();
        assert_eq!(vertex_array.id(), 0);
    }

    #[test]
    fn drop_deletes_the_object() {
        let device = Rc::new(RecordingGl::new());
        let id = {
            let program = GlProgram::create(Rc::clone(&device));
            program.id()
        };

        assert_eq!(device.count(|c| *c == Call::DeleteProgram(id)), 1);
    }

    #[test]
    fn moving_a_handle_does_not_delete_it() {
        let device = Rc::new(RecordingGl::new());
        let shader = GlShader::create(Rc::clone(&device), ShaderKind::Vertex);
        let id = shader.id();

        let moved = vec![shader];
        assert_eq!(device.count(|c| *c == Call::DeleteShader(id)), 0);

        drop(moved);
        assert_eq!(device.count(|c| *c == Call::DeleteShader(id)), 1);
    }

    #[test]
    fn uniforms_are_set_on_the_program_by_name() {
        let device = Rc::new(RecordingGl::new());
        let program = GlProgram::create(Rc::clone(&device));

        program.set_bool("useTexture", true);
        program.set_float("mixFactor", 0.5);
        program.set_int("missing", 7);

        let use_texture = device.uniform_location(program.id(), "useTexture");
        let mix_factor = device.uniform_location(program.id(), "mixFactor");
        assert!(device.calls().contains(&Call::Uniform1i(use_texture, 1)));
        assert!(device.calls().contains(&Call::Uniform1f(mix_factor, 0.5)));
        assert!(!device.calls().iter().any(|c| *c == Call::Uniform1i(-1, 7)));
    }
}
