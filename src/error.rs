use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::graphics::ShaderKind;

#[derive(Error, Debug)]
pub enum GlError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error compiling {kind} shader: {log}")]
    ShaderCompile { kind: ShaderKind, log: String },

    #[error("error linking shader program: {log}")]
    ShaderLink { log: String },

    #[error("could not decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not create the OpenGL context: {0}")]
    Context(String),

    #[error(transparent)]
    Geometry(#[from] geometry::Error),
}

pub type Result<T> = std::result::Result<T, GlError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages_name_what_failed() {
        let io = GlError::Io {
            path: PathBuf::from("shaders/basic.vert"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(io.to_string(), "could not read shaders/basic.vert: not found");

        let compile = GlError::ShaderCompile { kind: ShaderKind::Fragment, log: "0:3: bad".to_string() };
        assert_eq!(compile.to_string(), "error compiling fragment shader: 0:3: bad");

        let format: GlError = geometry::Error::UnsupportedPixelFormat { channels: 2 }.into();
        assert_eq!(format.to_string(), "unsupported pixel format: 2 channels (expected 3 or 4)");
    }
}
