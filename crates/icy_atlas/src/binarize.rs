//! Two-level conversion of the coverage atlas.

use image::{GrayImage, ImageBuffer, Luma, Pixel};

/// Luminance a sample has to exceed to count as foreground.
pub const THRESHOLD: u8 = 128;

/// A strict on/off image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl BinaryImage {
    /// All-background image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width as usize * height as usize],
        }
    }

    /// Builds an image from a row-major pixel vector.
    ///
    /// Returns `None` if the vector doesn't match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<bool>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = on;
    }

    /// One row of pixels, left to right. Empty past the last row.
    pub fn row(&self, y: u32) -> &[bool] {
        if y >= self.height {
            return &[];
        }
        let start = (y * self.width) as usize;
        &self.pixels[start..start + self.width as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    pub fn count_foreground(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }

    /// 8 bit luminance rendering, foreground = 255, background = 0.
    pub fn to_luma(&self) -> GrayImage {
        ImageBuffer::from_fn(self.width, self.height, |x, y| Luma([if self.get_pixel(x, y) { 255 } else { 0 }]))
    }
}

/// Thresholds any 8 bit image into a [`BinaryImage`].
///
/// Every pixel is reduced to its luminance first. Samples strictly above
/// [`THRESHOLD`] become foreground.
pub fn binarize<P>(image: &ImageBuffer<P, Vec<u8>>) -> BinaryImage
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = image.dimensions();
    let pixels = image.pixels().map(|p| p.to_luma().0[0] > THRESHOLD).collect();
    BinaryImage { width, height, pixels }
}
