use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stability of the DOM shape across repeated fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureClassification {
    Deterministic,
    MostlyDeterministic,
    Unstable,
}

impl StructureClassification {
    /// 0 differences is deterministic, exactly 1 is mostly-deterministic, anything more is unstable.
    pub fn from_difference_count(differences: usize) -> Self {
        match differences {
            0 => StructureClassification::Deterministic,
            1 => StructureClassification::MostlyDeterministic,
            _ => StructureClassification::Unstable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StructureClassification::Deterministic => "deterministic",
            StructureClassification::MostlyDeterministic => "mostly-deterministic",
            StructureClassification::Unstable => "unstable",
        }
    }
}

impl fmt::Display for StructureClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of the page's meaning is carried by markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticClassification {
    Explicit,
    Partial,
    Opaque,
}

impl SemanticClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticClassification::Explicit => "explicit",
            SemanticClassification::Partial => "partial",
            SemanticClassification::Opaque => "opaque",
        }
    }
}

impl fmt::Display for SemanticClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureResult {
    pub classification: StructureClassification,
    /// Unequal pairs among all C(N,2) sample pairs
    pub difference_count: usize,
    /// Deepest nesting of retained elements under body (direct children are 1)
    pub max_depth: usize,
    /// Direct body children that are sectioning elements
    pub top_level_sections: usize,
    /// Elements hosting a shadow subtree, once per host
    pub custom_elements: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingStats {
    pub h1_count: usize,
    pub has_skips: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkStats {
    /// Distinct region names, sorted
    pub found: BTreeSet<String>,
    /// 0..=100
    pub coverage_percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: usize,
    pub with_alt: usize,
    pub empty_alt: usize,
    pub missing_alt: usize,
    pub in_figure: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStats {
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStats {
    pub total: usize,
    pub with_headers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeStats {
    pub total: usize,
    pub with_datetime: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticResult {
    pub classification: SemanticClassification,
    pub headings: HeadingStats,
    pub landmarks: LandmarkStats,
    /// Generic containers over all elements, 0.0..=1.0
    pub div_ratio: f64,
    pub link_issues: usize,
    pub images: ImageStats,
    pub lists: ListStats,
    pub tables: TableStats,
    pub time_elements: TimeStats,
    pub lang_attribute: bool,
}

/// One complete run: produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub url: String,
    pub structure: StructureResult,
    pub semantics: SemanticResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_classification_boundaries() {
        assert_eq!(
            StructureClassification::from_difference_count(0),
            StructureClassification::Deterministic
        );
        assert_eq!(
            StructureClassification::from_difference_count(1),
            StructureClassification::MostlyDeterministic
        );
        assert_eq!(
            StructureClassification::from_difference_count(2),
            StructureClassification::Unstable
        );
        assert_eq!(
            StructureClassification::from_difference_count(45),
            StructureClassification::Unstable
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let structure = StructureResult {
            classification: StructureClassification::MostlyDeterministic,
            difference_count: 1,
            max_depth: 4,
            top_level_sections: 3,
            custom_elements: 0,
        };

        let json = serde_json::to_value(&structure).unwrap();

        assert_eq!(json["classification"], "mostly-deterministic");
        assert_eq!(json["differenceCount"], 1);
        assert_eq!(json["topLevelSections"], 3);
    }
}
