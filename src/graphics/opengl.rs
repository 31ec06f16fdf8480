//! The seam between glprimer and the OpenGL API.
//!
//! Every GL entry point the program uses goes through the [`GlDevice`] trait, and every GL object
//! wrapper holds an `Rc` of the device it was created on. That makes the context an explicit value
//! instead of hidden global state: nothing can issue a GL call without a device in hand, and the
//! `Rc` keeps every wrapper on the thread that owns the context. [`NativeGl`] is the real
//! implementation, a thin layer of `unsafe` calls into the `gl` crate.
//!
//! The binding model underneath is unchanged. Binding a vertex array or using a program still makes
//! it current for every following call, so the order of draws within a frame is up to the caller.

use std::ffi::{c_void, CStr};
use std::fmt;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::ptr::null;

use gl;
use gl::types::*;

use geometry::{ComponentKind, PixelFormat, VertexAttribute};

use super::utils::{bounded_log, INFO_LOG_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex = gl::VERTEX_SHADER as isize,
    Fragment = gl::FRAGMENT_SHADER as isize,
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => write!(f, "vertex"),
            ShaderKind::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array = gl::ARRAY_BUFFER as isize,
    Element = gl::ELEMENT_ARRAY_BUFFER as isize,
}

pub fn gl_pixel_format(format: PixelFormat) -> GLenum {
    match format {
        PixelFormat::Rgb => gl::RGB,
        PixelFormat::Rgba => gl::RGBA,
    }
}

pub fn gl_component_kind(kind: ComponentKind) -> GLenum {
    match kind {
        ComponentKind::F32 => gl::FLOAT,
    }
}

/// The subset of OpenGL that glprimer calls. Object ids are the raw GL names; the wrappers in
/// [`super::gl_types`] are what own them.
pub trait GlDevice {
    fn version(&self) -> String;
    fn renderer(&self) -> String;

    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compiled(&self, shader: GLuint) -> bool;
    /// The compile log, at most [`INFO_LOG_CAPACITY`] bytes including the terminating NUL.
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn program_linked(&self, program: GLuint) -> bool;
    /// The link log, at most [`INFO_LOG_CAPACITY`] bytes including the terminating NUL.
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);
    /// -1 if the program has no active uniform with that name.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_1i(&self, location: GLint, value: GLint);
    fn uniform_1f(&self, location: GLint, value: GLfloat);

    fn gen_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vertex_array: GLuint);
    fn delete_vertex_array(&self, vertex_array: GLuint);
    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute);
    fn enable_vertex_attrib_array(&self, location: GLuint);

    fn gen_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint);
    /// Uploads `data` to the buffer bound to `target` with the `STATIC_DRAW` usage hint.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: GLuint);

    fn draw_arrays(&self, first: GLint, count: GLsizei);
    /// Draws `count` `u32` indices from the start of the bound element buffer.
    fn draw_elements(&self, count: GLsizei);

    fn gen_texture(&self) -> GLuint;
    fn active_texture(&self, unit: GLuint);
    fn bind_texture(&self, texture: GLuint);
    fn tex_parameter(&self, name: GLenum, value: GLint);
    fn unpack_alignment(&self, alignment: GLint);
    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]);
    fn generate_mipmap(&self);
    fn delete_texture(&self, texture: GLuint);

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear(&self);
}

/// The real OpenGL device. There can only be a meaningful one of these per loaded context, and it
/// is neither `Send` nor `Sync`.
pub struct NativeGl {
    _context_thread: PhantomData<*const ()>,
}

impl NativeGl {
    /// Loads the GL function pointers through `loader`. The context the loader belongs to must be
    /// current on this thread for as long as the device is used.
    pub fn load_with<F>(loader: F) -> Self
        where F: FnMut(&'static str) -> *const c_void
    {
        gl::load_with(loader);
        Self { _context_thread: PhantomData }
    }

    fn get_string(&self, name: GLenum) -> String {
        unsafe {
            let ptr = gl::GetString(name);
            if ptr.is_null() {
                return String::new();
            }

            CStr::from_ptr(ptr as *const c_char).to_string_lossy().into_owned()
        }
    }
}

impl GlDevice for NativeGl {
    fn version(&self) -> String {
        self.get_string(gl::VERSION)
    }

    fn renderer(&self) -> String {
        self.get_string(gl::RENDERER)
    }

    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind as GLenum) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        // Passing the length means the source doesn't need to be NUL-terminated
        let ptr = source.as_ptr() as *const GLchar;
        let len = source.len() as GLint;
        unsafe { gl::ShaderSource(shader, 1, &ptr, &len); }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader); }
    }

    fn shader_compiled(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success); }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut buffer = vec![0u8; INFO_LOG_CAPACITY];
        let mut written = 0;
        unsafe {
            gl::GetShaderInfoLog(
                shader,
                INFO_LOG_CAPACITY as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar
            );
        }

        bounded_log(&buffer[..(written.max(0) as usize).min(INFO_LOG_CAPACITY)])
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader); }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader); }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader); }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program); }
    }

    fn program_linked(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, gl::LINK_STATUS, &mut success); }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut buffer = vec![0u8; INFO_LOG_CAPACITY];
        let mut written = 0;
        unsafe {
            gl::GetProgramInfoLog(
                program,
                INFO_LOG_CAPACITY as GLsizei,
                &mut written,
                buffer.as_mut_ptr() as *mut GLchar
            );
        }

        bounded_log(&buffer[..(written.max(0) as usize).min(INFO_LOG_CAPACITY)])
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program); }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program); }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        // A name with an interior NUL can't be a GLSL identifier
        let mut name = name.as_bytes().to_vec();
        if name.contains(&0) {
            return -1;
        }
        name.push(0);

        unsafe { gl::GetUniformLocation(program, name.as_ptr() as *const GLchar) }
    }

    fn uniform_1i(&self, location: GLint, value: GLint) {
        unsafe { gl::Uniform1i(location, value); }
    }

    fn uniform_1f(&self, location: GLint, value: GLfloat) {
        unsafe { gl::Uniform1f(location, value); }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe { gl::GenVertexArrays(1, &mut vao); }
        vao
    }

    fn bind_vertex_array(&self, vertex_array: GLuint) {
        unsafe { gl::BindVertexArray(vertex_array); }
    }

    fn delete_vertex_array(&self, vertex_array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array); }
    }

    fn vertex_attrib_pointer(&self, attribute: &VertexAttribute) {
        unsafe {
            gl::VertexAttribPointer(
                attribute.location,
                attribute.components,
                gl_component_kind(attribute.kind),
                gl::FALSE,
                attribute.stride as GLsizei,
                attribute.offset as *const c_void
            );
        }
    }

    fn enable_vertex_attrib_array(&self, location: GLuint) {
        unsafe { gl::EnableVertexAttribArray(location); }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe { gl::GenBuffers(1, &mut buffer); }
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        unsafe { gl::BindBuffer(target as GLenum, buffer); }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target as GLenum,
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer); }
    }

    fn draw_arrays(&self, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count); }
    }

    fn draw_elements(&self, count: GLsizei) {
        unsafe { gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_INT, null()); }
    }

    fn gen_texture(&self) -> GLuint {
        let mut texture = 0;
        unsafe { gl::GenTextures(1, &mut texture); }
        texture
    }

    fn active_texture(&self, unit: GLuint) {
        unsafe { gl::ActiveTexture(gl::TEXTURE0 + unit); }
    }

    fn bind_texture(&self, texture: GLuint) {
        unsafe { gl::BindTexture(gl::TEXTURE_2D, texture); }
    }

    fn tex_parameter(&self, name: GLenum, value: GLint) {
        unsafe { gl::TexParameteri(gl::TEXTURE_2D, name, value); }
    }

    fn unpack_alignment(&self, alignment: GLint) {
        unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, alignment); }
    }

    fn tex_image_2d(&self, width: u32, height: u32, format: PixelFormat, pixels: &[u8]) {
        let format = gl_pixel_format(format);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                width as GLsizei,
                height as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr() as *const c_void
            );
        }
    }

    fn generate_mipmap(&self) {
        unsafe { gl::GenerateMipmap(gl::TEXTURE_2D); }
    }

    fn delete_texture(&self, texture: GLuint) {
        unsafe { gl::DeleteTextures(1, &texture); }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height); }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { gl::ClearColor(red, green, blue, alpha); }
    }

    fn clear(&self) {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT); }
    }
}

/// Unbinds whatever buffer is bound to `target`.
pub fn unbind_buffers<D: GlDevice + ?Sized>(device: &D, target: BufferTarget) {
    device.bind_buffer(target, 0);
}
