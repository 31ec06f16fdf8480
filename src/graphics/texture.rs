use std::path::Path;
use std::rc::Rc;

use geometry::PixelFormat;
use gl;
use image::{DynamicImage, GenericImageView, ImageError};

use crate::error::{GlError, Result};

use super::gl_types::GlTexture;
use super::opengl::GlDevice;

/// Raw 8-bit pixels, tightly packed, with the format their channel count maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let image = image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => GlError::Io { path: path.to_path_buf(), source },
            source => GlError::Image { path: path.to_path_buf(), source },
        })?;

        Self::from_dynamic(image)
    }

    /// Picks RGB or RGBA from the image's channel count. Deeper images are converted down to 8 bits
    /// per channel; any channel count other than 3 or 4 is refused.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let format = PixelFormat::from_channels(image.color().channel_count())?;

        let pixels = match format {
            PixelFormat::Rgb => image.into_rgb8().into_raw(),
            PixelFormat::Rgba => image.into_rgba8().into_raw(),
        };

        Ok(Self { width, height, format, pixels })
    }
}

impl<D: GlDevice> GlTexture<D> {
    /// Uploads `image` as a 2D texture that repeats in both directions, filters linearly, and has
    /// a full mipmap chain.
    pub fn from_image(device: Rc<D>, image: &DecodedImage) -> Self {
        let texture = GlTexture::generate(device, image.width, image.height, image.format);
        let device = texture.device();
        device.bind_texture(texture.id());

        device.tex_parameter(gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
        device.tex_parameter(gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
        device.tex_parameter(gl::TEXTURE_MIN_FILTER, gl::LINEAR as i32);
        device.tex_parameter(gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);

        // Rows of an RGB image aren't 4-byte aligned unless the width happens to make them so
        device.unpack_alignment(1);
        device.tex_image_2d(image.width, image.height, image.format, &image.pixels);
        device.generate_mipmap();

        texture
    }

    pub fn from_file<P: AsRef<Path>>(device: Rc<D>, path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = DecodedImage::open(path).map_err(|e| {
            error!("failed to load texture {}: {}", path.display(), e);
            e
        })?;

        info!("loaded texture {} ({}x{}, {:?})", path.display(), image.width, image.height, image.format);

        Ok(Self::from_image(device, &image))
    }
}
