use std::path::Path;

use image::{ImageBuffer, ImageResult, Rgba, RgbaImage};

/// An RGBA pixel buffer ready to be blitted onto a 2-D surface.
///
/// `pixels.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SliceImage {
    /// Returns `None` when `pixels` does not hold exactly `width * height` RGBA pixels.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize * 4).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Opaque black image.
    pub fn blank(width: u32, height: u32) -> Self {
        let pixels = [0, 0, 0, u8::MAX].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[at..at + 4].try_into().ok()
    }

    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        ImageBuffer::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )
    }
}

impl From<ImageBuffer<Rgba<u8>, Vec<u8>>> for SliceImage {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }
}
