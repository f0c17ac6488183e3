// src/analysis/dom.rs
//! DOM helpers over html5ever's reference-counted tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use log::warn;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML document. The html5ever tree builder recovers from any
/// malformed input, so only a read failure can fail here; that degrades to
/// an empty document.
pub fn parse_html(html: &str) -> RcDom {
    match parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
    {
        Ok(dom) => dom,
        Err(e) => {
            warn!("Failed to read HTML sample, treating as empty: {}", e);
            RcDom::default()
        }
    }
}

/// Lower-cased local name of an element node, `None` for any other node kind.
pub fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some((*name.local).to_ascii_lowercase()),
        _ => None,
    }
}

/// Value of the named attribute on an element node.
pub fn attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (*a.name.local).eq_ignore_ascii_case(attr_name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Element children of a node, in document order.
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Locate `<body>` under the document's root element.
pub fn find_body(dom: &RcDom) -> Option<Handle> {
    let html = element_children(&dom.document)
        .into_iter()
        .find(|n| tag_name(n).as_deref() == Some("html"))?;

    element_children(&html)
        .into_iter()
        .find(|n| tag_name(n).as_deref() == Some("body"))
}
