//! Accumulating image buffer and final output conversion.

use std::path::Path;

use lumen_math::Interval;

use crate::{Color, RenderError};

/// Displayable intensity range for 8-bit output.
const INTENSITY: Interval = Interval { min: 0.0, max: 1.0 };

/// Row-major pixel grid accumulating summed sample colors.
///
/// `set_pixel` stores the raw sum of a pixel's samples; averaging, gamma
/// correction and clamping all happen at output time. Integration itself
/// is HDR and never clamps.
pub struct ImageBuffer {
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel: samples_per_pixel.max(1),
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// Store the summed sample color for one pixel. Row 0 is the top row.
    pub fn set_pixel(&mut self, row: u32, col: u32, summed_color: Color) {
        self.pixels[(row * self.width + col) as usize] = summed_color;
    }

    /// The stored (summed) color at (row, col).
    pub fn get(&self, row: u32, col: u32) -> Color {
        self.pixels[(row * self.width + col) as usize]
    }

    /// Convert to 8-bit RGBA, averaging samples and applying gamma 2.
    pub fn to_rgba(&self) -> Vec<u8> {
        let scale = 1.0 / self.samples_per_pixel as f32;
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color * scale));
        }
        bytes
    }

    /// Encode the buffer to an image file (format chosen by extension).
    pub fn write(&self, path: &Path) -> Result<(), RenderError> {
        log::info!("writing {}x{} image to {}", self.width, self.height, path.display());
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an averaged linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * INTENSITY.clamp(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * INTENSITY.clamp(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * INTENSITY.clamp(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-4);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-4);
        // Negative components clamp to black
        assert_eq!(linear_to_gamma(-1.0), 0.0);
    }

    #[test]
    fn test_set_and_get_row_major() {
        let mut buffer = ImageBuffer::new(4, 3, 1);
        buffer.set_pixel(2, 3, Color::ONE);

        assert_eq!(buffer.get(2, 3), Color::ONE);
        assert_eq!(buffer.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_to_rgba_averages_samples() {
        // Four samples summing to 1.0 average to 0.25, gamma to 0.5
        let mut buffer = ImageBuffer::new(1, 1, 4);
        buffer.set_pixel(0, 0, Color::new(1.0, 1.0, 1.0));

        let bytes = buffer.to_rgba();
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes[0], 127);
        assert_eq!(bytes[3], 255);
    }

    #[test]
    fn test_to_rgba_clamps_hdr() {
        let mut buffer = ImageBuffer::new(1, 1, 1);
        buffer.set_pixel(0, 0, Color::new(100.0, 100.0, 100.0));

        let bytes = buffer.to_rgba();
        assert_eq!(&bytes[..3], &[255, 255, 255]);
    }

    #[test]
    fn test_write_png() {
        let mut buffer = ImageBuffer::new(2, 2, 1);
        buffer.set_pixel(0, 0, Color::ONE);

        let path = std::env::temp_dir().join("lumen_image_buffer_test.png");
        buffer.write(&path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
