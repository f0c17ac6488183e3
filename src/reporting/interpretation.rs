// src/reporting/interpretation.rs
//! Interpretation
//!
//! What the measured values mean for a machine reader: one entry per
//! category with the finding, its implication and, where a pattern is
//! common in the wild, a baseline note. Bands come from
//! `analysis::thresholds`.

use serde::Serialize;

use crate::analysis::thresholds::{
    coverage_status, depth_status, div_ratio_status, sections_status,
};
use crate::analysis::SignalStatus;
use crate::models::{SemanticResult, StructureClassification, StructureResult};

use super::signals::percent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub category: &'static str,
    pub finding: String,
    pub implication: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<&'static str>,
}

impl Interpretation {
    fn new(category: &'static str, finding: impl Into<String>, implication: &'static str) -> Self {
        Self {
            category,
            finding: finding.into(),
            implication,
            baseline: None,
        }
    }

    fn with_baseline(mut self, baseline: &'static str) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn share(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        percent(part as f64 / total as f64)
    }
}

pub fn interpretations(
    structure: &StructureResult,
    semantics: &SemanticResult,
    fetches: usize,
) -> Vec<Interpretation> {
    let mut out = Vec::new();
    consistency(&mut out, structure, fetches);
    headings(&mut out, semantics);
    landmarks(&mut out, semantics);
    shape(&mut out, structure);
    markup(&mut out, semantics);
    images(&mut out, semantics);
    out
}

fn consistency(out: &mut Vec<Interpretation>, structure: &StructureResult, fetches: usize) {
    const CATEGORY: &str = "Structure Consistency";

    out.push(match structure.classification {
        StructureClassification::Deterministic if fetches <= 1 => Interpretation::new(
            CATEGORY,
            "Single fetch completed",
            "Baseline captured. Run multiple fetches to verify consistency.",
        ),
        StructureClassification::Deterministic => Interpretation::new(
            CATEGORY,
            format!("Identical across {} fetches", fetches),
            "The page delivers the same content on each visit, making it easy to cache and index.",
        ),
        StructureClassification::MostlyDeterministic => Interpretation::new(
            CATEGORY,
            format!("{} minor variation(s)", structure.difference_count),
            "The page is mostly stable with small differences between visits.",
        ),
        StructureClassification::Unstable => Interpretation::new(
            CATEGORY,
            format!("{} structural difference(s)", structure.difference_count),
            "Content changes between visits, which can make parsing and caching less reliable.",
        )
        .with_baseline("Typical for SPAs and dynamic content"),
    });
}

fn headings(out: &mut Vec<Interpretation>, semantics: &SemanticResult) {
    const CATEGORY: &str = "Semantic Headings";
    let headings = &semantics.headings;

    out.push(match (headings.h1_count, headings.has_skips) {
        (1, false) => Interpretation::new(
            CATEGORY,
            "1 H1, sequential hierarchy",
            "The document has a clear outline that helps machines identify the main topic.",
        ),
        (0, _) => Interpretation::new(
            CATEGORY,
            "H1 not present",
            "Machines will infer the page topic from other content instead.",
        )
        .with_baseline("Common for app shells and client-rendered pages"),
        (1, true) => Interpretation::new(
            CATEGORY,
            "Heading hierarchy has gaps",
            "Skipped heading levels mean the outline needs to be reconstructed from context.",
        ),
        (n, _) => Interpretation::new(
            CATEGORY,
            format!("{} H1 elements", n),
            "Multiple main headings can make the topic hierarchy less clear.",
        ),
    });
}

fn landmarks(out: &mut Vec<Interpretation>, semantics: &SemanticResult) {
    const CATEGORY: &str = "Semantic Landmarks";
    let coverage = semantics.landmarks.coverage_percent;
    let finding = format!("{}% in semantic regions", coverage);

    out.push(match coverage_status(coverage) {
        SignalStatus::Good => Interpretation::new(
            CATEGORY,
            finding,
            "Most content is in clearly defined regions, making navigation and extraction straightforward.",
        ),
        SignalStatus::Warning => Interpretation::new(
            CATEGORY,
            finding,
            "About half the content is in semantic regions; some boundaries need to be guessed.",
        ),
        SignalStatus::Issue => Interpretation::new(
            CATEGORY,
            finding,
            "Most content boundaries will be inferred from context rather than markup.",
        )
        .with_baseline("Common for legacy sites or framework markup"),
    });
}

fn shape(out: &mut Vec<Interpretation>, structure: &StructureResult) {
    let depth = structure.max_depth;
    match depth_status(depth) {
        SignalStatus::Good => {}
        SignalStatus::Warning => out.push(Interpretation::new(
            "Structure Depth",
            format!("{} levels deep", depth),
            "Moderate nesting depth, typical for most pages.",
        )),
        SignalStatus::Issue => out.push(Interpretation::new(
            "Structure Depth",
            format!("{} levels deep", depth),
            "Deep nesting can slow down traversal and make context harder to infer.",
        )),
    }

    let sections = structure.top_level_sections;
    out.push(match sections_status(sections) {
        SignalStatus::Good => Interpretation::new(
            "Structure Sections",
            format!("{} top-level sections", sections),
            "The page is well-segmented, making it easy to identify distinct regions.",
        ),
        SignalStatus::Warning => Interpretation::new(
            "Structure Sections",
            format!("{} top-level section{}", sections, plural(sections)),
            "Limited segmentation means some region boundaries need to be guessed.",
        ),
        SignalStatus::Issue => Interpretation::new(
            "Structure Sections",
            "No top-level sections",
            "Without explicit sections, regions will be inferred from the content itself.",
        ),
    });

    let hosts = structure.custom_elements;
    if hosts > 0 {
        out.push(Interpretation::new(
            "Structure Shadow DOM",
            format!("{} shadow DOM host{}", hosts, plural(hosts)),
            "Some content is hidden in shadow DOM and may not be visible to standard parsing.",
        ));
    }
}

fn markup(out: &mut Vec<Interpretation>, semantics: &SemanticResult) {
    let containers = format!("{}% generic containers", percent(semantics.div_ratio));
    out.push(match div_ratio_status(semantics.div_ratio) {
        SignalStatus::Issue => Interpretation::new(
            "Semantic Markup",
            containers,
            "Most elements are generic divs, so meaning is derived from class names rather than HTML semantics.",
        )
        .with_baseline("Common for component frameworks (React, Vue)"),
        SignalStatus::Warning => Interpretation::new(
            "Semantic Markup",
            containers,
            "A mix of semantic and generic elements; structure is partially self-describing.",
        ),
        SignalStatus::Good => Interpretation::new(
            "Semantic Markup",
            containers,
            "Most elements have semantic meaning, making the structure self-describing.",
        ),
    });

    if semantics.link_issues > 0 {
        out.push(Interpretation::new(
            "Semantic Links",
            format!("{} non-descriptive link(s)", semantics.link_issues),
            "Some links use generic text like \"click here\", so their purpose must be inferred from context.",
        ));
    } else {
        out.push(Interpretation::new(
            "Semantic Links",
            "All links descriptive",
            "All links clearly describe their destination, making navigation easy to understand.",
        ));
    }

    let times = &semantics.time_elements;
    if times.total > 0 {
        out.push(if times.with_datetime == times.total {
            Interpretation::new(
                "Semantic Time",
                format!("{} time element{} with datetime", times.total, plural(times.total)),
                "All timestamps are machine-readable, making date extraction reliable.",
            )
        } else if times.with_datetime > 0 {
            Interpretation::new(
                "Semantic Time",
                format!("{}/{} with datetime", times.with_datetime, times.total),
                "Some timestamps are machine-readable; others need to be parsed from text.",
            )
        } else {
            Interpretation::new(
                "Semantic Time",
                format!("{} without datetime", times.total),
                "Dates are displayed as text only, so they need to be parsed and interpreted.",
            )
        });
    }

    let lists = semantics.lists.total;
    if lists > 0 {
        out.push(Interpretation::new(
            "Semantic Lists",
            format!("{} list structure{}", lists, plural(lists)),
            "Lists provide clear item boundaries, making enumeration straightforward.",
        ));
    }

    let tables = &semantics.tables;
    let without_headers = tables.total.saturating_sub(tables.with_headers);
    if without_headers > 0 {
        out.push(Interpretation::new(
            "Semantic Tables",
            format!("{} table{} without headers", without_headers, plural(without_headers)),
            "Tables without headers require column meanings to be guessed from content.",
        ));
    }

    out.push(if semantics.lang_attribute {
        Interpretation::new(
            "Semantic Language",
            "Language declared",
            "The page specifies its language, enabling correct text processing.",
        )
    } else {
        Interpretation::new(
            "Semantic Language",
            "Language not declared",
            "The language will be detected automatically from the content.",
        )
    });
}

fn images(out: &mut Vec<Interpretation>, semantics: &SemanticResult) {
    let images = &semantics.images;
    if images.total == 0 {
        return;
    }

    if images.missing_alt == 0 {
        out.push(Interpretation::new(
            "Image Accessibility",
            "All images have alt",
            "Every image is clearly marked as meaningful or decorative.",
        ));
    } else {
        out.push(Interpretation::new(
            "Image Accessibility",
            format!(
                "{} image{} without alt ({}%)",
                images.missing_alt,
                plural(images.missing_alt),
                share(images.missing_alt, images.total)
            ),
            "Some images lack alt text, so their purpose must be guessed from context.",
        ));
    }

    if images.in_figure > 0 {
        out.push(Interpretation::new(
            "Image Context",
            format!(
                "{} in figure elements ({}%)",
                images.in_figure,
                share(images.in_figure, images.total)
            ),
            "Images in figures can be associated with their captions automatically.",
        ));
    }

    if images.empty_alt > 0 && images.with_alt > 0 {
        out.push(Interpretation::new(
            "Image Classification",
            format!("{} meaningful, {} decorative", images.with_alt, images.empty_alt),
            "Images are clearly classified, so machines know which ones carry content.",
        ));
    }
}
