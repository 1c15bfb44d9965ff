//! RGBA pixel raster

use super::Color;

/// A rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Flip negative extents so width and height are non-negative
    fn normalized(self) -> Self {
        let (x, width) = if self.width < 0 {
            (self.x.saturating_add(self.width), self.width.saturating_neg())
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0 {
            (self.y.saturating_add(self.height), self.height.saturating_neg())
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    /// Whether the pixel (x, y) lies inside the rect
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let r = self.normalized();
        let (x, y) = (i64::from(x), i64::from(y));
        x >= r.x
            && x < r.x.saturating_add(r.width)
            && y >= r.y
            && y < r.y.saturating_add(r.height)
    }
}

/// A single solid fill applied to a rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOperation {
    pub fill: Color,
    pub rect: PixelRect,
}

/// Pixel buffer backing a canvas
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize * 4; // RGBA
        Self {
            width,
            height,
            pixels: vec![0; size],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get pixel at (x, y); `None` when out of bounds
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    /// Set pixel at (x, y); out-of-bounds writes are dropped
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx..idx + 4].copy_from_slice(&rgba);
        }
    }

    /// Apply a paint operation, clipped to the raster bounds.
    /// Overlapping paints are last-write-wins.
    pub fn apply(&mut self, op: &PaintOperation) {
        let rect = op.rect.normalized();
        let x_start = rect.x.clamp(0, i64::from(self.width)) as u32;
        let y_start = rect.y.clamp(0, i64::from(self.height)) as u32;
        let x_end = (rect.x.saturating_add(rect.width)).clamp(0, i64::from(self.width)) as u32;
        let y_end = (rect.y.saturating_add(rect.height)).clamp(0, i64::from(self.height)) as u32;

        let rgba = op.fill.to_array();
        for y in y_start..y_end {
            for x in x_start..x_end {
                self.set_pixel(x, y, rgba);
            }
        }
    }

    /// Number of pixels whose alpha is non-zero
    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}
