// src/analysis/normalize.rs
//! DOM Normalization
//!
//! Reduces a raw HTML document to a comparable structural fingerprint: the
//! body tag plus the flattened pre-order sequence of every retained
//! descendant's tag name. Noise elements (scripts, styles, inline SVG) are
//! dropped along with their subtrees.

use markup5ever_rcdom::{Handle, RcDom};
use serde::{Deserialize, Serialize};

use super::dom::{element_children, find_body, parse_html, tag_name};
use super::tags::is_noise;

/// Structural fingerprint of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedNode {
    /// Lower-cased element name
    pub tag: String,

    /// Tag names of all retained descendants, depth-first, left to right
    pub child_tags: Vec<String>,
}

impl NormalizedNode {
    /// Fingerprint used when a document has no body to walk.
    pub fn empty_body() -> Self {
        Self {
            tag: "body".to_string(),
            child_tags: Vec::new(),
        }
    }

    /// Whole-shape equality: same tag and the exact same descendant sequence.
    pub fn same_shape(&self, other: &NormalizedNode) -> bool {
        self.tag == other.tag && self.child_tags == other.child_tags
    }
}

/// Normalize one HTML sample into the fingerprint of its `<body>`.
pub fn normalize(html: &str) -> NormalizedNode {
    normalize_dom(&parse_html(html))
}

/// Fingerprint of an already-parsed document.
pub fn normalize_dom(dom: &RcDom) -> NormalizedNode {
    find_body(dom)
        .and_then(|body| walk(&body))
        .unwrap_or_else(NormalizedNode::empty_body)
}

fn walk(node: &Handle) -> Option<NormalizedNode> {
    let tag = tag_name(node)?;
    if is_noise(&tag) {
        return None;
    }

    let mut child_tags = Vec::new();
    collect_descendants(node, &mut child_tags);

    Some(NormalizedNode { tag, child_tags })
}

/// Pre-order accumulation into a single buffer.
fn collect_descendants(node: &Handle, out: &mut Vec<String>) {
    for child in element_children(node) {
        let Some(tag) = tag_name(&child) else {
            continue;
        };
        if is_noise(&tag) {
            continue;
        }

        out.push(tag);
        collect_descendants(&child, out);
    }
}
