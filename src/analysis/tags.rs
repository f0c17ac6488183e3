// src/analysis/tags.rs
//! Tag Category Tables
//!
//! Every allowlist/denylist the analyzers consult lives here, so that the
//! categorisation of a tag can be audited in one place and tested on its own.

/// Non-content elements dropped from the structural fingerprint, subtree included.
pub const NOISE_TAGS: &[&str] = &["script", "style", "noscript", "svg", "path"];

/// Structural sectioning elements counted as top-level page sections.
pub const SECTIONING_TAGS: &[&str] = &[
    "header", "nav", "main", "section", "article", "aside", "footer",
];

/// Fully non-semantic block/inline wrappers.
pub const GENERIC_CONTAINER_TAGS: &[&str] = &["div", "span"];

/// Ordered, unordered and definition lists.
pub const LIST_TAGS: &[&str] = &["ul", "ol", "dl"];

/// Heading elements and their outline level.
pub const HEADING_LEVELS: &[(&str, u8)] = &[
    ("h1", 1),
    ("h2", 2),
    ("h3", 3),
    ("h4", 4),
    ("h5", 5),
    ("h6", 6),
];

/// Landmark region elements, keyed by tag. The value is the region name reported.
pub const LANDMARK_TAGS: &[(&str, &str)] = &[
    ("header", "header"),
    ("nav", "nav"),
    ("main", "main"),
    ("aside", "aside"),
    ("footer", "footer"),
    ("section", "section"),
];

/// ARIA roles equivalent to a landmark element, mapped to the same region name.
pub const LANDMARK_ROLES: &[(&str, &str)] = &[
    ("banner", "header"),
    ("navigation", "nav"),
    ("main", "main"),
    ("complementary", "aside"),
    ("contentinfo", "footer"),
    ("region", "section"),
];

/// Containers that give an image a caption context.
pub const FIGURE_TAGS: &[&str] = &["figure"];
pub const FIGURE_ROLES: &[&str] = &["figure"];

/// Attributes on a `<template>` child that attach a declarative shadow root to its parent.
pub const SHADOW_ROOT_ATTRS: &[&str] = &["shadowrootmode", "shadowroot"];

/// Link texts that say nothing about the link target.
pub const GENERIC_LINK_TEXT: &[&str] = &[
    "click here",
    "click",
    "here",
    "read more",
    "more",
    "learn more",
    "link",
    "this link",
    "go",
];

pub fn is_noise(tag: &str) -> bool {
    NOISE_TAGS.contains(&tag)
}

pub fn is_sectioning(tag: &str) -> bool {
    SECTIONING_TAGS.contains(&tag)
}

pub fn is_generic_container(tag: &str) -> bool {
    GENERIC_CONTAINER_TAGS.contains(&tag)
}

pub fn is_list(tag: &str) -> bool {
    LIST_TAGS.contains(&tag)
}

pub fn heading_level(tag: &str) -> Option<u8> {
    HEADING_LEVELS
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, level)| *level)
}

/// Resolve the landmark region an element opens, by tag first and then by `role`.
pub fn landmark_region(tag: &str, role: Option<&str>) -> Option<&'static str> {
    if let Some((_, region)) = LANDMARK_TAGS.iter().find(|(name, _)| *name == tag) {
        return Some(*region);
    }

    let role = role?.trim().to_ascii_lowercase();
    LANDMARK_ROLES
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, region)| *region)
}

pub fn is_figure(tag: &str, role: Option<&str>) -> bool {
    FIGURE_TAGS.contains(&tag)
        || role.is_some_and(|r| FIGURE_ROLES.contains(&r.trim().to_ascii_lowercase().as_str()))
}

/// Custom element names must contain a hyphen.
pub fn is_custom_element_name(tag: &str) -> bool {
    tag.contains('-')
}

/// True when link text is empty or one of the generic phrases.
/// Case and trailing punctuation/arrows ("Read more »", "here.") are ignored.
pub fn is_generic_link_text(text: &str) -> bool {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();

    trimmed.is_empty() || GENERIC_LINK_TEXT.contains(&trimmed.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_tags() {
        for tag in ["script", "style", "noscript", "svg", "path"] {
            assert!(is_noise(tag), "{tag} should be noise");
        }
        assert!(!is_noise("div"));
        assert!(!is_noise("template"));
    }

    #[test]
    fn test_landmark_by_tag_and_role() {
        assert_eq!(landmark_region("nav", None), Some("nav"));
        assert_eq!(landmark_region("div", Some("navigation")), Some("nav"));
        assert_eq!(landmark_region("div", Some(" Main ")), Some("main"));
        assert_eq!(landmark_region("div", Some("button")), None);
        assert_eq!(landmark_region("article", None), None);
    }

    #[test]
    fn test_every_role_maps_to_a_landmark_tag() {
        for (_, region) in LANDMARK_ROLES {
            assert!(
                LANDMARK_TAGS.iter().any(|(_, r)| r == region),
                "role region {region} has no tag counterpart"
            );
        }
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("header"), None);
    }

    #[test]
    fn test_generic_link_text() {
        assert!(is_generic_link_text(""));
        assert!(is_generic_link_text("   \n "));
        assert!(is_generic_link_text("Click here"));
        assert!(is_generic_link_text("READ   MORE »"));
        assert!(is_generic_link_text("here."));
        assert!(!is_generic_link_text("Quarterly report (PDF)"));
        assert!(!is_generic_link_text("Read more about pricing"));
    }

    #[test]
    fn test_figure_and_custom_elements() {
        assert!(is_figure("figure", None));
        assert!(is_figure("div", Some("figure")));
        assert!(!is_figure("div", None));
        assert!(is_custom_element_name("my-widget"));
        assert!(!is_custom_element_name("section"));
    }
}
