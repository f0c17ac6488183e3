// src/analysis/thresholds.rs
//! Shared Severity Thresholds
//!
//! The semantic classification and every per-signal severity shown to the
//! user are read from this one table, so the aggregate label can never
//! disagree with the individual signal bands.

use serde::{Deserialize, Serialize};

use crate::models::{HeadingStats, SemanticClassification};

/// Severity band of a single signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Good,
    Warning,
    Issue,
}

/// Two cut points splitting a metric into good / warning / issue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub good: f64,
    pub warning: f64,
    pub higher_is_better: bool,
}

impl Band {
    /// Higher is better: good at >= `good`, warning at >= `warning`.
    /// Lower is better: good below `good`, warning below `warning`.
    pub fn status(&self, value: f64) -> SignalStatus {
        if self.higher_is_better {
            if value >= self.good {
                SignalStatus::Good
            } else if value >= self.warning {
                SignalStatus::Warning
            } else {
                SignalStatus::Issue
            }
        } else if value < self.good {
            SignalStatus::Good
        } else if value < self.warning {
            SignalStatus::Warning
        } else {
            SignalStatus::Issue
        }
    }
}

/// Landmark coverage, in percent.
pub const LANDMARK_COVERAGE: Band = Band {
    good: 80.0,
    warning: 50.0,
    higher_is_better: true,
};

/// Generic container ratio, 0.0..=1.0.
pub const DIV_RATIO: Band = Band {
    good: 0.4,
    warning: 0.6,
    higher_is_better: false,
};

/// Deepest nesting under body: moderate from 10 levels, deep from 15.
pub const NESTING_DEPTH: Band = Band {
    good: 10.0,
    warning: 15.0,
    higher_is_better: false,
};

/// Sectioning elements directly under body.
pub const TOP_LEVEL_SECTIONS: Band = Band {
    good: 3.0,
    warning: 1.0,
    higher_is_better: true,
};

pub fn depth_status(max_depth: usize) -> SignalStatus {
    NESTING_DEPTH.status(max_depth as f64)
}

pub fn sections_status(top_level_sections: usize) -> SignalStatus {
    TOP_LEVEL_SECTIONS.status(top_level_sections as f64)
}

pub fn coverage_status(coverage_percent: u8) -> SignalStatus {
    LANDMARK_COVERAGE.status(f64::from(coverage_percent))
}

pub fn div_ratio_status(div_ratio: f64) -> SignalStatus {
    DIV_RATIO.status(div_ratio)
}

/// Exactly one h1 and no skipped levels is good; no h1 at all is an issue.
pub fn heading_status(headings: &HeadingStats) -> SignalStatus {
    match (headings.h1_count, headings.has_skips) {
        (1, false) => SignalStatus::Good,
        (0, _) => SignalStatus::Issue,
        _ => SignalStatus::Warning,
    }
}

/// Aggregate label: explicit when every banded signal is good, opaque when
/// coverage or container ratio is in its issue band, partial otherwise.
pub fn classify(
    headings: &HeadingStats,
    coverage_percent: u8,
    div_ratio: f64,
) -> SemanticClassification {
    let coverage = coverage_status(coverage_percent);
    let containers = div_ratio_status(div_ratio);

    if coverage == SignalStatus::Good
        && containers == SignalStatus::Good
        && heading_status(headings) == SignalStatus::Good
    {
        SemanticClassification::Explicit
    } else if coverage == SignalStatus::Issue || containers == SignalStatus::Issue {
        SemanticClassification::Opaque
    } else {
        SemanticClassification::Partial
    }
}
