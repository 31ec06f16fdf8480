//! The window, its GL context, and the render loop.

use std::ffi::c_void;
use std::rc::Rc;

use glutin::dpi::LogicalSize;
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::ContextBuilder;

use crate::error::{GlError, Result};
use crate::graphics::{GlDevice, GlTexture, GraphicsResource, NativeGl, Uploaded};

use super::cli::Config;

/// What gets drawn every frame.
struct Scene<D: GlDevice> {
    resource: GraphicsResource<D, Uploaded<D>>,
    texture: Option<GlTexture<D>>,
}

impl<D: GlDevice> Scene<D> {
    fn load(device: &Rc<D>, config: &Config) -> Result<Self> {
        let resource = GraphicsResource::new(
            Rc::clone(device),
            &config.vertex_shader,
            &config.fragment_shader,
            config.shape.geometry()
        );

        let resource = resource.link()?.upload();

        let texture = match &config.texture {
            Some(path) => Some(GlTexture::from_file(Rc::clone(device), path)?),
            None => None,
        };

        let program = resource.program();
        program.set_bool("useTexture", texture.is_some());
        program.set_int("texture1", 0);
        program.set_float("mixFactor", config.mix);

        Ok(Self { resource, texture })
    }

    fn draw(&self) {
        if let Some(texture) = &self.texture {
            texture.bind(0);
        }

        self.resource.draw();
    }

    fn release(self) {
        let Scene { resource, texture } = self;
        resource.release();

        if let Some(mut texture) = texture {
            texture.release();
        }
    }
}

/// Opens the window and draws until it is closed or Escape is pressed. Only returns on a
/// start-up error.
pub fn run(config: Config) -> Result<()> {
    let events = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

    let context = ContextBuilder::new()
        .with_vsync(true)
        .build_windowed(window, &events)
        .map_err(|e| GlError::Context(e.to_string()))?;

    let context = unsafe { context.make_current() }
        .map_err(|(_, e)| GlError::Context(e.to_string()))?;

    let device = Rc::new(NativeGl::load_with(|s| context.get_proc_address(s) as *const c_void));
    info!("OpenGL {} on {}", device.version(), device.renderer());

    let size = context.window().inner_size();
    device.viewport(0, 0, size.width as i32, size.height as i32);
    device.clear_color(0.0, 0.0, 0.0, 1.0);

    let mut scene = Some(Scene::load(&device, &config)?);

    events.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(size) => {
                    context.resize(size);
                    device.viewport(0, 0, size.width as i32, size.height as i32);
                },

                WindowEvent::CloseRequested => close(&mut scene, control_flow),

                WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                    ..
                } => close(&mut scene, control_flow),

                _ => {}
            },

            Event::MainEventsCleared => context.window().request_redraw(),

            Event::RedrawRequested(_) => {
                device.clear();

                if let Some(scene) = &scene {
                    scene.draw();
                }

                if let Err(e) = context.swap_buffers() {
                    error!("failed to swap buffers: {}", e);
                }
            },

            _ => {}
        }
    })
}

/// The event loop never returns, so GPU objects are released here rather than left to `Drop`.
fn close<D: GlDevice>(scene: &mut Option<Scene<D>>, control_flow: &mut ControlFlow) {
    if let Some(scene) = scene.take() {
        scene.release();
    }

    info!("window closed");
    *control_flow = ControlFlow::Exit;
}
