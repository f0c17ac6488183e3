// src/analysis/mod.rs
//! Analysis Core
//!
//! Pure, synchronous analysis of already-fetched HTML samples:
//! - `normalize`: body fingerprint with noise removed
//! - `structural`: all-pairs fingerprint comparison and shape metrics
//! - `semantics`: markup-quality signals for a single document
//!
//! `analyze` is the only entry point most callers need.

pub mod dom;
pub mod normalize;
pub mod semantics;
pub mod structural;
pub mod tags;
pub mod thresholds;

pub use normalize::{normalize, NormalizedNode};
pub use semantics::analyze_semantics;
pub use structural::compare_structure;
pub use thresholds::SignalStatus;

use thiserror::Error;

use crate::models::AnalysisResult;

/// Errors raised by the analysis core. Markup problems never surface here;
/// they only lower scores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No HTML samples to analyze")]
    EmptySamples,
}

/// Analyze a batch of samples fetched from `url`.
///
/// Structure is compared across every sample; semantics are scored on the
/// first sample only.
pub fn analyze<S: AsRef<str>>(samples: &[S], url: &str) -> Result<AnalysisResult, AnalysisError> {
    let first = samples.first().ok_or(AnalysisError::EmptySamples)?;

    let structure = compare_structure(samples)?;
    let semantics = analyze_semantics(first.as_ref());

    Ok(AnalysisResult {
        url: url.to_string(),
        structure,
        semantics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StructureClassification;

    #[test]
    fn test_analyze_merges_both_components() {
        let html = r#"<html lang="en"><body><main><h1>Hi</h1></main></body></html>"#;
        let result = analyze(&[html, html], "https://example.com/").unwrap();

        assert_eq!(result.url, "https://example.com/");
        assert_eq!(result.structure.classification, StructureClassification::Deterministic);
        assert_eq!(result.semantics.headings.h1_count, 1);
        assert!(result.semantics.lang_attribute);
    }

    #[test]
    fn test_semantics_come_from_first_sample() {
        let first = "<body><h1>One</h1></body>";
        let second = "<body><h1>One</h1><h1>Two</h1></body>";

        let result = analyze(&[first, second], "https://example.com/").unwrap();
        assert_eq!(result.semantics.headings.h1_count, 1);
        assert_eq!(result.structure.difference_count, 1);
    }

    #[test]
    fn test_empty_batch() {
        let samples: Vec<String> = Vec::new();
        assert_eq!(
            analyze(samples.as_slice(), "https://example.com/"),
            Err(AnalysisError::EmptySamples)
        );
    }
}
