//! Owned RGBA raster that the player paints hair onto.
//!
//! The surface mirrors the `<canvas>` element pixel for pixel (row-major RGBA8,
//! origin top-left) so the browser runtime can blit it straight into
//! `ImageData`. Only alpha matters for scoring; color is kept so the canvas
//! shows the chosen dye.

use crate::brush::{BrushSettings, Tool};
use crate::error::{Error, Result};

/// Point in surface pixel space (not normalized).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Create a fully transparent surface. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Wrap pixel data read back from elsewhere (e.g. a canvas `ImageData`).
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let mut surface = Self::new(width, height)?;
        if pixels.len() != surface.pixels.len() {
            return Err(Error::BufferSize {
                width,
                height,
                expected: surface.pixels.len(),
                actual: pixels.len(),
            });
        }
        surface.pixels = pixels;
        Ok(surface)
    }

    /// Skips the length check so the unreadable-buffer path can be exercised.
    #[cfg(test)]
    pub(crate) fn from_raw_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
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

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes ready for `ImageData`.
    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// RGBA at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.pixel(x, y).map(|p| p[3])
    }

    /// Number of pixels whose alpha is strictly above `threshold`.
    ///
    /// Fails when the backing buffer no longer matches the dimensions, which is
    /// the one way pixel data can become unreadable for an owned surface.
    pub fn covered_pixels(&self, threshold: u8) -> Result<usize> {
        let expected = self.pixel_count() * 4;
        if self.pixels.len() != expected {
            return Err(Error::BufferSize {
                width: self.width,
                height: self.height,
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(self
            .pixels
            .chunks_exact(4)
            .filter(|px| px[3] > threshold)
            .count())
    }

    /// Rasterize one stroke segment with round caps.
    ///
    /// Every pixel whose center lies within `brush.radius()` of the segment is
    /// written: paint replaces color and sets alpha to 255 (source-over with an
    /// opaque brush), erase zeroes the pixel (destination-out). A zero-length
    /// segment stamps a round dot. Returns the number of pixels touched.
    pub fn stroke_segment(&mut self, from: Point, to: Point, brush: &BrushSettings) -> usize {
        let r = brush.radius();
        let min_x = (from.x.min(to.x) - r).floor().max(0.0);
        let min_y = (from.y.min(to.y) - r).floor().max(0.0);
        let max_x = (from.x.max(to.x) + r).ceil().min(self.width as f64 - 1.0);
        let max_y = (from.y.max(to.y) + r).ceil().min(self.height as f64 - 1.0);
        if max_x < min_x || max_y < min_y || !(r > 0.0) {
            return 0;
        }

        let ink = match brush.tool {
            Tool::Paint => [brush.color.r, brush.color.g, brush.color.b, 255],
            Tool::Erase => [0, 0, 0, 0],
        };
        let r2 = r * r;
        let mut touched = 0;
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_sq_to_segment(center, from, to) <= r2 {
                    let i = self.offset(x, y);
                    self.pixels[i..i + 4].copy_from_slice(&ink);
                    touched += 1;
                }
            }
        }
        touched
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

// Project P onto segment AB and return the squared distance to the nearest point.
fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.x + abx * t, a.y + aby * t);
    (p.x - qx) * (p.x - qx) + (p.y - qy) * (p.y - qy)
}
