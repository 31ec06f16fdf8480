//! A `GlDevice` that records calls instead of making them, for tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gl::types::*;

use geometry::{PixelFormat, VertexAttribute};

use super::opengl::{BufferTarget, GlDevice, ShaderKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderKind, GLuint),
    ShaderSource(GLuint),
    CompileShader(GLuint),
    DeleteShader(GLuint),
    CreateProgram(GLuint),
    AttachShader(GLuint, GLuint),
    DetachShader(GLuint, GLuint),
    LinkProgram(GLuint),
    UseProgram(GLuint),
    DeleteProgram(GLuint),
    Uniform1i(GLint, GLint),
    Uniform1f(GLint, GLfloat),
    GenVertexArray(GLuint),
    BindVertexArray(GLuint),
    DeleteVertexArray(GLuint),
    VertexAttribPointer(VertexAttribute),
    EnableVertexAttribArray(GLuint),
    GenBuffer(GLuint),
    BindBuffer(BufferTarget, GLuint),
    BufferData(BufferTarget, usize),
    DeleteBuffer(GLuint),
    DrawArrays(GLint, GLsizei),
    DrawElements(GLsizei),
    GenTexture(GLuint),
    ActiveTexture(GLuint),
    BindTexture(GLuint),
    TexParameter(GLenum, GLint),
    UnpackAlignment(GLint),
    TexImage2D { width: u32, height: u32, format: PixelFormat, len: usize },
    GenerateMipmap,
    DeleteTexture(GLuint),
    Viewport(GLint, GLint, GLsizei, GLsizei),
    ClearColor(f32, f32, f32, f32),
    Clear,
}

impl Call {
    pub fn is_draw(&self) -> bool {
        match self {
            Call::DrawArrays(..) | Call::DrawElements(..) => true,
            _ => false,
        }
    }

    pub fn is_delete(&self) -> bool {
        match self {
            Call::DeleteShader(_) | Call::DeleteProgram(_) | Call::DeleteVertexArray(_)
            | Call::DeleteBuffer(_) | Call::DeleteTexture(_) => true,
            _ => false,
        }
    }
}

/// Uniform names every recorded program reports as active.
const UNIFORMS: [&str; 3] = ["texture1", "useTexture", "mixFactor"];

/// Compiles anything non-empty unless told to fail a stage, and links anything unless told to fail
/// the link. Buffer uploads are kept so tests can read back what reached the "GPU".
#[derive(Debug, Default)]
pub struct RecordingGl {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<GLuint>,
    shaders: RefCell<HashMap<GLuint, (ShaderKind, String)>>,
    bound: RefCell<HashMap<BufferTarget, GLuint>>,
    buffers: RefCell<HashMap<GLuint, Vec<u8>>>,
    fail_compile: Option<ShaderKind>,
    fail_link: bool,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_compile(kind: ShaderKind) -> Self {
        Self { fail_compile: Some(kind), ..Self::default() }
    }

    pub fn failing_link() -> Self {
        Self { fail_link: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, matches: F) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    /// Bytes last uploaded to the buffer named `id`.
    pub fn buffer_contents(&self, id: GLuint) -> Option<Vec<u8>> {
        self.buffers.borrow().get(&id).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> GLuint {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl GlDevice for RecordingGl {
    fn version(&self) -> String {
        "3.3.0 (recording)".to_string()
    }

    fn renderer(&self) -> String {
        "recording".to_string()
    }

    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let id = self.next();
        self.shaders.borrow_mut().insert(id, (kind, String::new()));
        self.record(Call::CreateShader(kind, id));
        id
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        if let Some(entry) = self.shaders.borrow_mut().get_mut(&shader) {
            entry.1 = source.to_string();
        }
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: GLuint) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compiled(&self, shader: GLuint) -> bool {
        match self.shaders.borrow().get(&shader) {
            Some((kind, source)) => !source.trim().is_empty() && self.fail_compile != Some(*kind),
            None => false,
        }
    }

    fn shader_info_log(&self, _shader: GLuint) -> String {
        // Longer than any real driver would fit in the buffer
        super::utils::bounded_log("0:1(1): error: syntax error, unexpected $end\n".repeat(40).as_bytes())
    }

    fn delete_shader(&self, shader: GLuint) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GLuint {
        let id = self.next();
        self.record(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: GLuint) {
        self.record(Call::LinkProgram(program));
    }

    fn program_linked(&self, _program: GLuint) -> bool {
        !self.fail_link
    }

    fn program_info_log(&self, _program: GLuint) -> String {
        "error: vertex shader output `vColor' not read by fragment shader".to_string()
    }

    fn use_program(&self, program: GLuint) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: GLuint) {
        self.record(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, _program: GLuint, name: &str) -> GLint {
        UNIFORMS.iter()
            .position(|&u| u == name)
            .map_or(-1, |n| n as GLint)
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        self.record(Call::Uniform1i(location, value));
    }

    fn uniform_1f(&self, location: GLint, value: GLfloat) {
        self.record(Call::Uniform1f(location, value));
    }

    fn gen_vertex_array(&self) -> GLuint {
        let id = self.next();
        self.record(Call::GenVertexArray(id));
        id
    }

    fn bind_vertex_array(&self, vertex_array: GLuint) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: GLuint) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        self.record(Call::VertexAttribPointer(*attribute));
    }

    fn enable_vertex_attrib_array(&self, location: GLuint) {
        self.record(Call::EnableVertexAttribArray(location));
    }

    fn gen_buffer(&self) -> GLuint {
        let id = self.next();
        self.record(Call::GenBuffer(id));
        id
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        self.bound.borrow_mut().insert(target, buffer);
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        if let Some(&id) = self.bound.borrow().get(&target) {
            self.buffers.borrow_mut().insert(id, data.to_vec());
        }
        self.record(Call::BufferData(target, data.len()));
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.record(Call::DeleteBuffer(buffer));
    }

    fn draw_arrays(&self, first: GLint, count: GLsizei) {
        self.record(Call::DrawArrays(first, count));
    }

    fn draw_elements(&self, count: GLsizei) {
        self.record(Call::DrawElements(count));
    }

    fn gen_texture(&self) -> GLuint {
        let id = self.next();
        self.record(Call::GenTexture(id));
        id
    }

    fn active_texture(&self, unit: GLuint) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: GLuint) {
        self.record(Call::BindTexture(texture));
    }

    fn tex_parameter(&self, name: GLenum, value: GLint) {
        self.record(Call::TexParameter(name, value));
    }

    fn unpack_alignment(&self, alignment: GLint) {
        self.record(Call::UnpackAlignment(alignment));
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        self.record(Call::TexImage2D { width, height, format, len: pixels.len() });
    }

    fn generate_mipmap(&self) {
        self.record(Call::GenerateMipmap);
    }

    fn delete_texture(&self, texture: GLuint) {
        self.record(Call::DeleteTexture(texture));
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.record(Call::ClearColor(red, green, blue, alpha));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }
}
