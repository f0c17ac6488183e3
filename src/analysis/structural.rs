// src/analysis/structural.rs
//! Structural Comparison
//!
//! Classifies how stable a page's DOM shape is across repeated fetches.
//! Every sample is normalized to a flattened fingerprint and all unordered
//! pairs are compared for whole-shape equality:
//! - 0 unequal pairs: deterministic
//! - exactly 1: mostly-deterministic
//! - 2 or more: unstable
//!
//! Shape metrics (depth, top-level sections, custom element hosts) are read
//! from the first sample's full element tree rather than the fingerprint.

use log::debug;
use markup5ever_rcdom::{Handle, RcDom};

use super::dom::{attr, element_children, find_body, parse_html, tag_name};
use super::normalize::{normalize, normalize_dom, NormalizedNode};
use super::tags::{is_custom_element_name, is_noise, is_sectioning, SHADOW_ROOT_ATTRS};
use super::AnalysisError;
use crate::models::{StructureClassification, StructureResult};

/// Compare N raw HTML samples of the same resource.
pub fn compare_structure<S: AsRef<str>>(samples: &[S]) -> Result<StructureResult, AnalysisError> {
    let first = samples.first().ok_or(AnalysisError::EmptySamples)?;

    // The first sample's tree serves both the fingerprint and the shape metrics.
    let first_dom = parse_html(first.as_ref());
    let shape = ShapeMetrics::from_dom(&first_dom);

    let mut trees: Vec<NormalizedNode> = Vec::with_capacity(samples.len());
    trees.push(normalize_dom(&first_dom));
    trees.extend(samples[1..].iter().map(|s| normalize(s.as_ref())));
    let difference_count = count_differences(&trees);

    debug!(
        "Compared {} samples: {} differing pairs, depth {}, {} sections, {} custom elements",
        trees.len(),
        difference_count,
        shape.max_depth,
        shape.top_level_sections,
        shape.custom_elements
    );

    Ok(StructureResult {
        classification: StructureClassification::from_difference_count(difference_count),
        difference_count,
        max_depth: shape.max_depth,
        top_level_sections: shape.top_level_sections,
        custom_elements: shape.custom_elements,
    })
}

/// Number of unordered pairs (i < j) whose fingerprints differ.
pub fn count_differences(trees: &[NormalizedNode]) -> usize {
    let mut differences = 0;

    for (i, a) in trees.iter().enumerate() {
        for b in &trees[i + 1..] {
            if !a.same_shape(b) {
                differences += 1;
            }
        }
    }

    differences
}

/// Shape of one document's retained element tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeMetrics {
    pub max_depth: usize,
    pub top_level_sections: usize,
    pub custom_elements: usize,
}

impl ShapeMetrics {
    pub fn from_dom(dom: &RcDom) -> Self {
        match find_body(dom) {
            Some(body) => Self::from_body(&body),
            None => Self::default(),
        }
    }

    fn from_body(body: &Handle) -> Self {
        let mut metrics = ShapeMetrics::default();

        for child in element_children(body) {
            if tag_name(&child).is_some_and(|t| is_sectioning(&t)) {
                metrics.top_level_sections += 1;
            }
        }

        metrics.visit(body, 0);
        metrics
    }

    fn visit(&mut self, node: &Handle, depth: usize) {
        self.max_depth = self.max_depth.max(depth);

        for child in element_children(node) {
            let Some(tag) = tag_name(&child) else {
                continue;
            };
            if is_noise(&tag) {
                continue;
            }

            if hosts_shadow_tree(&child, &tag) {
                self.custom_elements += 1;
            }

            self.visit(&child, depth + 1);
        }
    }
}

/// A shadow host is a custom element or any element carrying a declarative
/// shadow root (`<template shadowrootmode>` as a direct child).
fn hosts_shadow_tree(node: &Handle, tag: &str) -> bool {
    if is_custom_element_name(tag) {
        return true;
    }

    element_children(node).iter().any(|child| {
        tag_name(child).as_deref() == Some("template")
            && SHADOW_ROOT_ATTRS.iter().any(|name| attr(child, name).is_some())
    })
}
