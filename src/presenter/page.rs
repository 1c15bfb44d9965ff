//! A loaded presentation document and its drawing surface

use crate::document::Document;
use crate::surface::DrawingSurface;
use crate::utils::SurfaceUnavailable;

/// A presentation document loaded into the presenter
#[derive(Debug)]
pub struct Page {
    /// The document URL
    url: String,
    /// The DOM document
    document: Document,
    /// Surface activated on document-ready
    surface: Option<DrawingSurface>,
    /// Whether activation already ran for this load
    activated: bool,
}

impl Page {
    /// Create a page from a parsed document
    pub fn new(url: String, document: Document) -> Self {
        Self {
            url,
            document,
            surface: None,
            activated: false,
        }
    }

    /// Activate the drawing surface. Runs at most once per page; later calls
    /// return without touching the document.
    pub fn activate(&mut self) -> Result<(), SurfaceUnavailable> {
        if self.activated {
            return Ok(());
        }
        self.activated = true;
        self.surface = Some(DrawingSurface::initialize(&mut self.document)?);
        Ok(())
    }

    /// Get the page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the DOM document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The drawing surface, if activation succeeded
    pub fn surface(&self) -> Option<&DrawingSurface> {
        self.surface.as_ref()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlParser;

    #[test]
    fn test_activate_once() {
        let doc = HtmlParser::new()
            .parse(r#"<canvas id="canvas"></canvas>"#)
            .unwrap();
        let mut page = Page::new("file:///index.html".to_string(), doc);
        page.activate().unwrap();
        assert!(page.is_activated());
        assert!(page.surface().is_some());

        // A second activation leaves the existing surface in place
        page.activate().unwrap();
        assert_eq!(page.surface().unwrap().raster().painted_pixel_count(), 20_000);
    }

    #[test]
    fn test_activation_failure_leaves_no_surface() {
        let doc = HtmlParser::new().parse("<p>no canvas</p>").unwrap();
        let mut page = Page::new("file:///index.html".to_string(), doc);
        assert!(page.activate().is_err());
        assert!(page.is_activated());
        assert!(page.surface().is_none());
        assert_eq!(page.url(), "file:///index.html");
    }
}
