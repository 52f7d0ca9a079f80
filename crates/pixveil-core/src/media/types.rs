use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{DynamicImage, RgbImage};
use log::error;

use crate::error::SteganoError;
use crate::result::Result;

use super::Persist;

/// color channels per pixel, the codec works on RGB only
pub const CHANNELS_PER_PIXEL: usize = 3;

/// An RGB image as a flat, zero-indexed channel sequence.
///
/// Pixels are stored row-major, each with 3 channels (R, G, B), so the channel
/// `c` of pixel `(x, y)` lives at index `(y * width + x) * 3 + c`.
/// It serves as carrier and as image payload alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: Vec<u8>) -> Result<Self> {
        let expected = Self::channel_count(width, height);
        if channels.len() != expected {
            return Err(SteganoError::InvalidCarrierLength {
                expected,
                actual: channels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// builds a buffer by asking `f` for every pixel, row by row
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut channels = Vec::with_capacity(Self::channel_count(width, height));
        for y in 0..height {
            for x in 0..width {
                channels.extend_from_slice(&f(x, y));
            }
        }

        Self {
            width,
            height,
            channels,
        }
    }

    pub fn from_image(img: DynamicImage) -> Self {
        let rgb = img.into_rgb8();
        let (width, height) = rgb.dimensions();

        Self {
            width,
            height,
            channels: rgb.into_raw(),
        }
    }

    /// decodes any image format the `image` crate understands and converts it to RGB8
    pub fn open(f: &Path) -> Result<Self> {
        let img = image::open(f).map_err(|e| {
            error!("Error opening image {f:?}: {e}");
            SteganoError::InvalidImageMedia
        })?;

        Ok(Self::from_image(img))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    pub fn channels_mut(&mut self) -> &mut [u8] {
        &mut self.channels
    }

    pub fn into_channels(self) -> Vec<u8> {
        self.channels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS_PER_PIXEL;

        Some([self.channels[i], self.channels[i + 1], self.channels[i + 2]])
    }

    pub fn to_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.channels.clone())
            .ok_or(SteganoError::ImageEncodingError)
    }

    fn channel_count(width: u32, height: u32) -> usize {
        width as usize * height as usize * CHANNELS_PER_PIXEL
    }
}

impl Persist for PixelBuffer {
    fn save_as(&mut self, file: &Path) -> Result<()> {
        self.save_png(file)
    }
}

impl PixelBuffer {
    /// always written as PNG, a lossy format would destroy the hidden bits
    pub fn save_png(&self, file: &Path) -> Result<()> {
        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            SteganoError::WriteError { source: e }
        })?;
        self.save_to_writer(BufWriter::new(f))
    }

    pub fn save_to_writer<W: std::io::Write + std::io::Seek>(&self, mut writer: W) -> Result<()> {
        self.to_image()?
            .write_to(&mut writer, image::ImageFormat::Png)
            .map_err(|e| {
                error!("Error saving image: {e}");
                SteganoError::ImageEncodingError
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn should_reject_channel_buffers_of_wrong_length() {
        let result = PixelBuffer::new(2, 2, vec![0; 11]);

        assert!(matches!(
            result,
            Err(SteganoError::InvalidCarrierLength {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn should_map_pixels_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, (x + y * 3) as u8]);

        assert_eq!(buffer.channels()[..6], [0, 0, 0, 1, 0, 1]);
        assert_eq!(buffer.pixel(2, 1), Some([2, 1, 5]));
        // (y * width + x) * 3 = (1 * 3 + 2) * 3 = 15
        assert_eq!(buffer.channels()[15..18], [2, 1, 5]);
        assert_eq!(buffer.pixel(3, 0), None);
    }

    #[test]
    fn should_survive_a_png_round_trip() {
        let buffer = PixelBuffer::from_fn(7, 5, |x, y| [x as u8 * 30, y as u8 * 50, 255]);
        let mut png = Cursor::new(Vec::new());
        buffer.save_to_writer(&mut png).unwrap();

        let img = image::load_from_memory(png.get_ref()).unwrap();
        assert_eq!(PixelBuffer::from_image(img), buffer);
    }

    #[test]
    fn should_save_and_open_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pixels.png");
        let mut buffer = PixelBuffer::from_fn(4, 3, |x, y| [x as u8, y as u8, 7]);

        buffer.save_as(&file).unwrap();

        assert_eq!(PixelBuffer::open(&file).unwrap(), buffer);
    }

    #[test]
    fn should_fail_on_files_that_are_no_images() {
        assert!(matches!(
            PixelBuffer::open(Path::new("Cargo.toml")),
            Err(SteganoError::InvalidImageMedia)
        ));
    }

    #[test]
    fn should_drop_the_alpha_channel() {
        let rgba = image::RgbaImage::from_pixel(2, 1, image::Rgba([1, 2, 3, 4]));
        let buffer = PixelBuffer::from_image(DynamicImage::ImageRgba8(rgba));

        assert_eq!(buffer.channels(), &[1, 2, 3, 1, 2, 3]);
    }
}
