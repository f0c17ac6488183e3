// src/reporting/signals.rs
//! Signal Lists & Insights
//!
//! Turns an `AnalysisResult` into the human-facing pieces the renderers lay
//! out: per-signal status lines, classification summaries and categorized
//! insights. Every severity comes from `analysis::thresholds`.

use serde::Serialize;
use std::fmt;

use crate::analysis::thresholds::{coverage_status, div_ratio_status, heading_status};
use crate::analysis::SignalStatus;
use crate::models::{
    SemanticClassification, SemanticResult, StructureClassification, StructureResult,
};

/// One line in a signal panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub status: SignalStatus,
    pub text: String,
}

impl Signal {
    fn new(status: SignalStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Structure,
    Semantics,
    Accessibility,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InsightCategory::Structure => "structure",
            InsightCategory::Semantics => "semantics",
            InsightCategory::Accessibility => "accessibility",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
}

impl Insight {
    fn new(title: impl Into<String>, description: &str, category: InsightCategory) -> Self {
        Self {
            title: title.into(),
            description: description.to_string(),
            category,
        }
    }
}

// ============================================================================
// Summaries
// ============================================================================

pub const STRUCTURE_HEADING_TOOLTIP: &str =
    "Structure refers to the consistency of the DOM tree across multiple requests.";

pub const SEMANTICS_HEADING_TOOLTIP: &str =
    "Semantics refers to how much meaning is conveyed through HTML elements rather than visual styling.";

pub fn structure_description(classification: StructureClassification) -> &'static str {
    match classification {
        StructureClassification::Deterministic => {
            "Document structure is consistent across requests."
        }
        StructureClassification::MostlyDeterministic => {
            "Minor structural variations detected between requests."
        }
        StructureClassification::Unstable => "Structure varies significantly between requests.",
    }
}

pub fn structure_tooltip(classification: StructureClassification) -> &'static str {
    match classification {
        StructureClassification::Deterministic => {
            "Deterministic means repeated requests produce the same DOM structure."
        }
        StructureClassification::MostlyDeterministic => {
            "Mostly-deterministic means the structure is largely stable with minor variations."
        }
        StructureClassification::Unstable => {
            "Unstable means the DOM structure changes between requests."
        }
    }
}

pub fn semantics_description(classification: SemanticClassification) -> &'static str {
    match classification {
        SemanticClassification::Explicit => "Semantic meaning is conveyed through HTML elements.",
        SemanticClassification::Partial => "Some semantic structure present, with gaps.",
        SemanticClassification::Opaque => "Meaning relies on visual presentation or inference.",
    }
}

pub fn semantics_tooltip(classification: SemanticClassification) -> &'static str {
    match classification {
        SemanticClassification::Explicit => {
            "Explicit means meaning is encoded directly in HTML elements and attributes."
        }
        SemanticClassification::Partial => {
            "Partial means some meaning is encoded in markup, but gaps exist."
        }
        SemanticClassification::Opaque => {
            "Opaque means machines must infer meaning from presentation or context."
        }
    }
}

// ============================================================================
// Signal lists
// ============================================================================

/// Stability signals for a run of `fetches` samples.
pub fn structural_signals(structure: &StructureResult, fetches: usize) -> Vec<Signal> {
    let mut items = Vec::new();

    if structure.difference_count == 0 {
        items.push(Signal::new(
            SignalStatus::Good,
            format!("Identical structure across {} fetches", fetches),
        ));
    } else {
        items.push(Signal::new(
            SignalStatus::Warning,
            format!(
                "{} structural difference(s) detected",
                structure.difference_count
            ),
        ));
    }

    items.push(match structure.classification {
        StructureClassification::Deterministic => {
            Signal::new(SignalStatus::Good, "DOM tree is deterministic")
        }
        StructureClassification::MostlyDeterministic => {
            Signal::new(SignalStatus::Warning, "Minor variations in DOM structure")
        }
        StructureClassification::Unstable => {
            Signal::new(SignalStatus::Issue, "Structure changes between requests")
        }
    });

    if structure.top_level_sections > 0 {
        items.push(Signal::new(
            SignalStatus::Good,
            format!(
                "{} top-level sectioning element(s), nesting depth {}",
                structure.top_level_sections, structure.max_depth
            ),
        ));
    } else {
        items.push(Signal::new(
            SignalStatus::Warning,
            format!(
                "No top-level sectioning elements, nesting depth {}",
                structure.max_depth
            ),
        ));
    }

    if structure.custom_elements > 0 {
        items.push(Signal::new(
            SignalStatus::Warning,
            format!(
                "{} custom element(s) may hide content in shadow trees",
                structure.custom_elements
            ),
        ));
    }

    items
}

pub fn semantic_signals(semantics: &SemanticResult) -> Vec<Signal> {
    let mut items = Vec::new();
    let headings = &semantics.headings;

    let heading_text = match (headings.h1_count, headings.has_skips) {
        (1, false) => "Single h1, no skipped heading levels".to_string(),
        (1, true) => "Single h1, but heading levels are skipped".to_string(),
        (0, _) => "No h1 element found".to_string(),
        (n, _) => format!("{} h1 elements (expected 1)", n),
    };
    items.push(Signal::new(heading_status(headings), heading_text));

    let coverage = semantics.landmarks.coverage_percent;
    let coverage_band = coverage_status(coverage);
    let coverage_text = if coverage_band == SignalStatus::Issue {
        format!("Only {}% content in landmarks", coverage)
    } else {
        format!("{}% content in landmark regions", coverage)
    };
    items.push(Signal::new(coverage_band, coverage_text));

    let div_percent = percent(semantics.div_ratio);
    let div_band = div_ratio_status(semantics.div_ratio);
    let div_text = if div_band == SignalStatus::Issue {
        format!("{}% div/span ratio (heavy on generic elements)", div_percent)
    } else {
        format!("{}% div/span ratio", div_percent)
    };
    items.push(Signal::new(div_band, div_text));

    if semantics.link_issues == 0 {
        items.push(Signal::new(SignalStatus::Good, "All links have descriptive text"));
    } else {
        items.push(Signal::new(
            SignalStatus::Warning,
            format!(
                "{} link(s) with non-descriptive text",
                semantics.link_issues
            ),
        ));
    }

    let images = &semantics.images;
    if images.total > 0 {
        if images.missing_alt == 0 {
            items.push(Signal::new(
                SignalStatus::Good,
                format!("All {} image(s) declare alt text", images.total),
            ));
        } else {
            items.push(Signal::new(
                SignalStatus::Warning,
                format!(
                    "{} of {} image(s) missing alt attribute",
                    images.missing_alt, images.total
                ),
            ));
        }
    }

    let tables = &semantics.tables;
    if tables.total > 0 {
        let status = if tables.with_headers == tables.total {
            SignalStatus::Good
        } else {
            SignalStatus::Warning
        };
        items.push(Signal::new(
            status,
            format!(
                "{} of {} table(s) have header cells",
                tables.with_headers, tables.total
            ),
        ));
    }

    let times = &semantics.time_elements;
    if times.total > 0 {
        let status = if times.with_datetime == times.total {
            SignalStatus::Good
        } else {
            SignalStatus::Warning
        };
        items.push(Signal::new(
            status,
            format!(
                "{} of {} time element(s) carry a machine-readable datetime",
                times.with_datetime, times.total
            ),
        ));
    }

    if semantics.lang_attribute {
        items.push(Signal::new(SignalStatus::Good, "Document language is declared"));
    } else {
        items.push(Signal::new(SignalStatus::Warning, "No lang attribute on the root element"));
    }

    items
}

// ============================================================================
// Insights
// ============================================================================

pub fn insights(structure: &StructureResult, semantics: &SemanticResult) -> Vec<Insight> {
    let mut out = Vec::new();

    if structure.classification == StructureClassification::Deterministic {
        out.push(Insight::new(
            "Deterministic structure",
            "The page returns identical DOM structure across multiple fetches, providing consistent machine-readable content.",
            InsightCategory::Structure,
        ));
    } else {
        out.push(Insight::new(
            "Variable DOM structure detected",
            "The page structure differs between requests. Machines may see different content representations on each visit.",
            InsightCategory::Structure,
        ));
    }

    match semantics.headings.h1_count {
        0 => out.push(Insight::new(
            "No H1 heading present",
            "The page lacks a primary heading element. Machines cannot identify the main topic from markup alone.",
            InsightCategory::Semantics,
        )),
        1 => {}
        n => out.push(Insight::new(
            format!("{} H1 headings found", n),
            "Multiple primary headings exist. This creates ambiguity about document structure for automated systems.",
            InsightCategory::Semantics,
        )),
    }

    if semantics.headings.has_skips {
        out.push(Insight::new(
            "Heading hierarchy has gaps",
            "The document uses non-sequential heading levels (e.g. H1 then H3). This breaks the implicit outline structure.",
            InsightCategory::Accessibility,
        ));
    }

    let coverage = semantics.landmarks.coverage_percent;
    if coverage < 50 {
        out.push(Insight::new(
            format!("{}% landmark coverage", coverage),
            "Most content is not within semantic regions. Machines must infer content boundaries from visual or contextual cues.",
            InsightCategory::Semantics,
        ));
    } else if coverage < 100 {
        out.push(Insight::new(
            format!("{}% landmark coverage", coverage),
            "Partial use of semantic regions. Some content areas are explicitly defined, others require interpretation.",
            InsightCategory::Semantics,
        ));
    }

    if div_ratio_status(semantics.div_ratio) == SignalStatus::Issue {
        out.push(Insight::new(
            format!("{}% generic container elements", percent(semantics.div_ratio)),
            "High proportion of <div> and <span> elements. Structural meaning relies on class names or visual presentation rather than markup.",
            InsightCategory::Semantics,
        ));
    }

    if semantics.link_issues > 0 {
        out.push(Insight::new(
            format!("{} non-descriptive link(s)", semantics.link_issues),
            "Some links use generic text (\"click here\", \"read more\"). Link purpose must be inferred from surrounding context.",
            InsightCategory::Accessibility,
        ));
    }

    if semantics.images.missing_alt > 0 {
        out.push(Insight::new(
            format!("{} image(s) without alt", semantics.images.missing_alt),
            "Images without an alt attribute give machines no description of their content.",
            InsightCategory::Accessibility,
        ));
    }

    out
}

/// Ratio in 0.0..=1.0 as a rounded whole percent.
pub fn percent(ratio: f64) -> u32 {
    (ratio.clamp(0.0, 1.0) * 100.0).round() as u32
}
