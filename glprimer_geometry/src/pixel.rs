use crate::Error;

/// Layout of the decoded pixel bytes handed to the texture upload.
///
/// Only 8-bit RGB and RGBA are accepted. Grayscale images are rejected rather than guessed at,
/// and color-space (sRGB) handling is left to the shaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Result<Self, Error> {
        match channels {
            3 => Ok(PixelFormat::Rgb),
            4 => Ok(PixelFormat::Rgba),
            _ => Err(Error::UnsupportedPixelFormat { channels }),
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Size in bytes of a tightly packed `width` x `height` image in this format.
    pub fn image_len(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.channels() as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channel_count_selects_format() {
        assert_eq!(PixelFormat::from_channels(4), Ok(PixelFormat::Rgba));
        assert_eq!(PixelFormat::from_channels(3), Ok(PixelFormat::Rgb));

        for &channels in &[0u8, 1, 2, 5] {
            assert_eq!(
                PixelFormat::from_channels(channels),
                Err(Error::UnsupportedPixelFormat { channels })
            );
        }
    }

    #[test]
    fn image_len_counts_every_channel() {
        assert_eq!(PixelFormat::Rgb.image_len(5, 3), 45);
        assert_eq!(PixelFormat::Rgba.image_len(5, 3), 60);
    }
}
