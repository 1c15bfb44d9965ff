//! Drawing surface owned by the presenter process
//!
//! A [`CanvasSurface`] binds a [`RasterContext2d`] to the document's canvas
//! element in one step: if the element is missing or cannot host a 2D
//! context, no surface exists and no raster operation can be issued.

mod color;
mod context;
mod raster;

pub use color::Color;
pub use context::RasterContext2d;
pub use raster::{PaintOperation, PixelRect, Raster};

use log::info;

use crate::document::Document;
use crate::utils::SurfaceUnavailable;

/// Identifier of the canvas element in the presentation document
pub const CANVAS_ID: &str = "canvas";
/// Canvas pixel width
pub const CANVAS_WIDTH: u32 = 800;
/// Canvas pixel height
pub const CANVAS_HEIGHT: u32 = 600;
/// Fill style of the initial paint
pub const INITIAL_FILL: &str = "black";
/// Region covered by the initial paint
pub const INITIAL_RECT: PixelRect = PixelRect {
    x: 0,
    y: 0,
    width: 100,
    height: 200,
};

/// A canvas element with its bound 2D context
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    width: u32,
    height: u32,
    context: RasterContext2d,
}

impl CanvasSurface {
    /// Bind a 2D context to the element `id` and size it.
    ///
    /// The element's `width`/`height` attributes are overwritten with the
    /// given dimensions whatever the markup said.
    pub fn bind(
        document: &mut Document,
        id: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, SurfaceUnavailable> {
        let element = document
            .element_by_id_mut(id)
            .ok_or_else(|| SurfaceUnavailable::MissingElement(id.to_string()))?;

        if !element.is_tag("canvas") {
            return Err(SurfaceUnavailable::ContextBinding {
                id: id.to_string(),
                tag: element.tag_name.clone(),
            });
        }

        element.set_attribute("width", width.to_string());
        element.set_attribute("height", height.to_string());

        Ok(Self {
            width,
            height,
            context: RasterContext2d::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn context(&self) -> &RasterContext2d {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RasterContext2d {
        &mut self.context
    }
}

/// The presenter's drawing surface
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    canvas: CanvasSurface,
}

impl DrawingSurface {
    /// Bind the canvas, size it to 800x600 and apply the initial paint
    pub fn initialize(document: &mut Document) -> Result<Self, SurfaceUnavailable> {
        let mut canvas = CanvasSurface::bind(document, CANVAS_ID, CANVAS_WIDTH, CANVAS_HEIGHT)?;

        let ctx = canvas.context_mut();
        ctx.set_fill_style(INITIAL_FILL);
        ctx.fill_rect(
            INITIAL_RECT.x,
            INITIAL_RECT.y,
            INITIAL_RECT.width,
            INITIAL_RECT.height,
        );

        info!(
            "drawing surface ready ({}x{}, {} pixels painted)",
            canvas.width(),
            canvas.height(),
            canvas.context().raster().painted_pixel_count()
        );
        Ok(Self { canvas })
    }

    pub fn canvas(&self) -> &CanvasSurface {
        &self.canvas
    }

    /// Shortcut to the canvas raster
    pub fn raster(&self) -> &Raster {
        self.canvas.context().raster()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlParser;

    fn parse(html: &str) -> Document {
        HtmlParser::new().parse(html).unwrap()
    }

    #[test]
    fn test_initialize_paints_region() {
        let mut doc = parse(r#"<body><canvas id="canvas" width="5" height="5"></canvas></body>"#);
        let surface = DrawingSurface::initialize(&mut doc).unwrap();

        let raster = surface.raster();
        assert_eq!((raster.width(), raster.height()), (800, 600));
        assert_eq!(raster.get_pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(raster.get_pixel(99, 199), Some([0, 0, 0, 255]));
        assert_eq!(raster.get_pixel(100, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.get_pixel(0, 200), Some([0, 0, 0, 0]));
        assert_eq!(raster.painted_pixel_count(), 100 * 200);

        let canvas = doc.element_by_id(CANVAS_ID).unwrap();
        assert_eq!(canvas.get_attribute("width"), Some(&"800".to_string()));
        assert_eq!(canvas.get_attribute("height"), Some(&"600".to_string()));
    }

    #[test]
    fn test_missing_canvas() {
        let mut doc = parse("<body><p>no canvas here</p></body>");
        let err = DrawingSurface::initialize(&mut doc).unwrap_err();
        assert_eq!(err, SurfaceUnavailable::MissingElement("canvas".to_string()));
    }

    #[test]
    fn test_non_canvas_element_fails_binding() {
        let mut doc = parse(r#"<body><div id="canvas"></div></body>"#);
        let err = DrawingSurface::initialize(&mut doc).unwrap_err();
        assert!(matches!(err, SurfaceUnavailable::ContextBinding { ref tag, .. } if tag == "div"));
        // Binding failed before the element was touched
        assert!(doc.element_by_id(CANVAS_ID).unwrap().get_attribute("width").is_none());
    }
}
