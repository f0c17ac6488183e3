// src/reporting/mod.rs
//! Reporting
//!
//! Signal lists, insights, interpretations and the renderers that lay
//! them out for a terminal or as JSON.

pub mod interpretation;
pub mod signals;
pub mod text;

pub use interpretation::{interpretations, Interpretation};
pub use signals::{insights, semantic_signals, structural_signals, Insight, Signal};
pub use text::{render_comparison, render_explanations, render_json, render_text};

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(ReportFormat::from_str("JSON"), ReportFormat::Json);
        assert_eq!(ReportFormat::from_str("text"), ReportFormat::Text);
        assert_eq!(ReportFormat::from_str("anything"), ReportFormat::Text);
    }
}
