//! HTML tree adapter over html5ever's reference DOM
//!
//! Wraps parsing, serialization, and the handful of node operations the
//! template engine needs. Nodes are `markup5ever_rcdom::Handle`s, so the tree
//! can be mutated in place through shared references.

use std::io;
use std::rc::Rc;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, ParseOpts};
use markup5ever::{LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use thiserror::Error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Errors from parsing or serializing markup
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("failed to parse markup: {0}")]
    Parse(#[source] io::Error),

    #[error("failed to serialize markup: {0}")]
    Serialize(#[source] io::Error),

    #[error("serialized markup is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A parsed HTML document
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse a complete HTML document
    pub fn parse(text: &str) -> Result<Self, MarkupError> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut text.as_bytes())
            .map_err(MarkupError::Parse)?;
        Ok(Self { dom })
    }

    /// The document node
    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    /// All elements with the given tag name, in document order
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<Handle> {
        elements_by_tag_name(self.root(), tag)
    }

    /// Serialize the whole document, doctype included
    pub fn serialize(&self) -> Result<String, MarkupError> {
        serialize_children(self.root())
    }
}

/// Parse markup as the contents of a `<body>` element
///
/// Returns the top-level nodes, detached and ready to be inserted elsewhere.
pub fn parse_fragment_nodes(markup: &str) -> Result<Vec<Handle>, MarkupError> {
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from("body"),
    );
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .map_err(MarkupError::Parse)?;

    // Fragment parsing places the nodes under a synthetic <html> element
    let html = dom.document.children.borrow().first().cloned();
    let nodes = match html {
        Some(html) => html.children.take(),
        None => Vec::new(),
    };
    for node in &nodes {
        node.parent.set(None);
    }
    Ok(nodes)
}

/// Elements named `tag` in `root`'s subtree (including `root`), in document order
pub fn elements_by_tag_name(root: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if tag_name(&node).as_deref() == Some(tag) {
            found.push(node.clone());
        }
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
    found
}

/// Local tag name of an element node
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Value of an attribute on an element
pub fn attribute(element: &Handle, name: &str) -> Option<String> {
    match &element.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Direct child elements, in document order (text and comments are skipped)
pub fn child_elements(element: &Handle) -> Vec<Handle> {
    element
        .children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Serialized markup of an element's children
pub fn inner_html(element: &Handle) -> Result<String, MarkupError> {
    serialize_children(element)
}

fn serialize_children(node: &Handle) -> Result<String, MarkupError> {
    let mut buf = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut buf, &SerializableHandle::from(node.clone()), opts)
        .map_err(MarkupError::Serialize)?;
    Ok(String::from_utf8(buf)?)
}

/// Parent of a node, if it has one
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

/// Whether a node is still reachable from a document root
pub fn is_attached(node: &Handle) -> bool {
    let mut current = node.clone();
    loop {
        if matches!(current.data, NodeData::Document) {
            return true;
        }
        match parent(&current) {
            Some(p) => current = p,
            None => return false,
        }
    }
}

/// Replace `element` with `nodes` at the same position in its parent
///
/// The element ends up detached. Returns false when the element had no parent.
pub fn replace_with_children(element: &Handle, nodes: Vec<Handle>) -> bool {
    let Some(parent) = parent(element) else {
        return false;
    };
    let mut children = parent.children.borrow_mut();
    let Some(position) = children.iter().position(|child| Rc::ptr_eq(child, element)) else {
        return false;
    };

    for node in &nodes {
        node.parent.set(Some(Rc::downgrade(&parent)));
    }
    children.splice(position..=position, nodes);
    element.parent.set(None);
    true
}
