use std::path::PathBuf;

use clap::{App, ArgMatches};

use geometry::Shape;

/// Everything the window loop needs to know, taken from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub texture: Option<PathBuf>,
    pub mix: f32,
    pub shape: Shape,
}

impl Config {
    /// Parses the process arguments, printing usage and exiting on bad input.
    pub fn from_args() -> Self {
        let yaml = load_yaml!("cli.yaml");
        let matches = App::from_yaml(yaml).get_matches();

        Self::from_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mix = value_t!(matches, "mix", f32)?;
        if !(0.0..=1.0).contains(&mix) {
            return Err(clap::Error::value_validation_auto(
                format!("--mix must be between 0 and 1, got {}", mix)
            ));
        }

        Ok(Self {
            title: matches.value_of("title").unwrap_or("OpenGL").to_string(),
            width: value_t!(matches, "width", u32)?,
            height: value_t!(matches, "height", u32)?,
            vertex_shader: matches.value_of("vertex").unwrap_or_default().into(),
            fragment_shader: matches.value_of("fragment").unwrap_or_default().into(),
            texture: matches.value_of("texture").map(PathBuf::from),
            mix,
            shape: value_t!(matches, "shape", Shape)?,
        })
    }
}
