//! DOM (Document Object Model) for presentation documents

use std::collections::HashMap;

/// Node types in the DOM
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
    /// Document root
    Document,
    /// Element node (e.g., <canvas>)
    Element(ElementData),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
}

/// Data for element nodes
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Tag name (e.g., "div", "canvas")
    pub tag_name: String,
    /// Element attributes
    pub attributes: HashMap<String, String>,
}

impl ElementData {
    /// Create a new element
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<&String> {
        self.attributes.get(name)
    }

    /// Set an attribute value
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Get the ID attribute
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Whether the tag name matches, ignoring ASCII case
    pub fn is_tag(&self, tag_name: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag_name)
    }
}

/// A node in the DOM tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type and data
    pub node_type: NodeType,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    /// Create a new node
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            children: Vec::new(),
        }
    }

    /// Create an element node
    pub fn element(tag_name: impl Into<String>) -> Self {
        Self::new(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeType::Text(content.into()))
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get element data if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Depth-first search for the first element carrying `id`
    fn find_by_id(&self, id: &str) -> Option<&ElementData> {
        if let Some(element) = self.as_element() {
            if element.id().map(String::as_str) == Some(id) {
                return Some(element);
            }
        }
        self.children.iter().find_map(|child| child.find_by_id(id))
    }

    fn find_by_id_mut(&mut self, id: &str) -> Option<&mut ElementData> {
        let matches = self
            .as_element()
            .is_some_and(|element| element.id().map(String::as_str) == Some(id));
        if matches {
            return self.as_element_mut();
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }
}

/// The DOM document
#[derive(Debug, Clone)]
pub struct Document {
    /// Root node
    pub root: Node,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            root: Node::new(NodeType::Document),
        }
    }

    /// Find the first element whose `id` attribute equals `id`
    pub fn element_by_id(&self, id: &str) -> Option<&ElementData> {
        self.root.find_by_id(id)
    }

    /// Mutable variant of [`Document::element_by_id`]
    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut ElementData> {
        self.root.find_by_id_mut(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let mut body = Node::element("body");
        let mut canvas = ElementData::new("canvas");
        canvas.set_attribute("id", "canvas");
        body.add_child(Node::text("hello"));
        body.add_child(Node::new(NodeType::Element(canvas)));
        doc.root.add_child(body);
        doc
    }

    #[test]
    fn test_element_by_id() {
        let doc = sample();
        let canvas = doc.element_by_id("canvas").unwrap();
        assert!(canvas.is_tag("CANVAS"));
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_element_by_id_mut() {
        let mut doc = sample();
        doc.element_by_id_mut("canvas")
            .unwrap()
            .set_attribute("width", "800");
        assert_eq!(
            doc.element_by_id("canvas").unwrap().get_attribute("width"),
            Some(&"800".to_string())
        );
    }
}
