//! 2D raster context bound to a canvas element

use log::debug;

use super::raster::{PaintOperation, PixelRect, Raster};
use super::Color;

/// 2D raster context. It always owns a raster; there is no unbound state.
#[derive(Debug, Clone)]
pub struct RasterContext2d {
    raster: Raster,
    fill_style: Color,
}

impl RasterContext2d {
    pub(super) fn new(width: u32, height: u32) -> Self {
        Self {
            raster: Raster::new(width, height),
            fill_style: Color::BLACK,
        }
    }

    /// Current fill style
    pub fn fill_style(&self) -> Color {
        self.fill_style
    }

    /// Set the fill style from a CSS color string.
    ///
    /// Unparseable values are ignored and the previous style is kept.
    pub fn set_fill_style(&mut self, value: &str) -> bool {
        match Color::parse(value) {
            Some(color) => {
                self.fill_style = color;
                true
            }
            None => {
                debug!("ignoring unparseable fill style '{}'", value);
                false
            }
        }
    }

    /// Fill a rectangle with the current fill style
    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64) {
        let op = PaintOperation {
            fill: self.fill_style,
            rect: PixelRect::new(x, y, width, height),
        };
        self.raster.apply(&op);
    }

    /// The raster this context draws into
    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}
