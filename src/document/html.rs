//! HTML5 parser for presentation documents using html5ever

use super::dom::{Document, ElementData, Node, NodeType};
use crate::utils::{DocumentError, Result};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// HTML5 parser using html5ever
pub struct HtmlParser {
    opts: ParseOpts,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self {
            opts: ParseOpts {
                tree_builder: TreeBuilderOpts {
                    drop_doctype: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        }
    }

    /// Parse HTML content into a DOM document
    pub fn parse(&self, content: &str) -> Result<Document> {
        if content.trim().is_empty() {
            return Ok(Document::new());
        }

        let dom = parse_document(RcDom::default(), self.opts.clone())
            .from_utf8()
            .read_from(&mut content.as_bytes())
            .map_err(|e| DocumentError::Parse(e.to_string()))?;

        let mut document = Document::new();
        for child in dom.document.children.borrow().iter() {
            if let Some(node) = convert_node(child) {
                document.root.add_child(node);
            }
        }
        Ok(document)
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an rcdom node into our owned tree
fn convert_node(handle: &Handle) -> Option<Node> {
    let mut node = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut element = ElementData::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element.set_attribute(attr.name.local.to_string(), attr.value.to_string());
            }
            Node::new(NodeType::Element(element))
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if text.trim().is_empty() {
                return None;
            }
            return Some(Node::text(text.to_string()));
        }
        NodeData::Comment { contents } => {
            return Some(Node::new(NodeType::Comment(contents.to_string())));
        }
        _ => return None,
    };

    for child in handle.children.borrow().iter() {
        if let Some(converted) = convert_node(child) {
            node.add_child(converted);
        }
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_html() {
        let parser = HtmlParser::new();
        let doc = parser.parse("").unwrap();
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_parse_canvas_document() {
        let parser = HtmlParser::new();
        let doc = parser
            .parse(
                r#"<!DOCTYPE html>
                <html>
                    <head><title>Pixel Editor</title></head>
                    <body><canvas id="canvas" width="10" height="10"></canvas></body>
                </html>"#,
            )
            .unwrap();

        let canvas = doc.element_by_id("canvas").unwrap();
        assert_eq!(canvas.tag_name, "canvas");
        assert_eq!(canvas.get_attribute("width"), Some(&"10".to_string()));
    }

    #[test]
    fn test_parse_malformed_html() {
        // html5ever should handle malformed HTML gracefully
        let parser = HtmlParser::new();
        let doc = parser
            .parse("<p>Unclosed paragraph<div id=\"x\">Another")
            .unwrap();
        assert!(doc.element_by_id("x").is_some());
    }
}
