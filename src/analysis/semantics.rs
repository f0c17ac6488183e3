// src/analysis/semantics.rs
//! Semantic Markup Analysis
//!
//! Scores one document on how much of its meaning is carried by markup:
//! heading outline, landmark coverage, generic container ratio, link text,
//! image alternatives, lists, tables, machine-readable times and the
//! language declaration. All signals are gathered in a single walk of the
//! body and then rolled into one classification via the shared thresholds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use scraper::{ElementRef, Html};
use std::collections::BTreeSet;

use super::tags::{
    heading_level, is_figure, is_generic_container, is_generic_link_text, is_list, is_noise,
    landmark_region,
};
use super::thresholds::classify;
use crate::models::{
    HeadingStats, ImageStats, LandmarkStats, ListStats, SemanticResult, TableStats, TimeStats,
};

/// Analyze one raw HTML document. Never fails: missing elements yield zeroes.
pub fn analyze_semantics(html: &str) -> SemanticResult {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let lang_attribute = ["lang", "xml:lang"]
        .iter()
        .any(|name| root.value().attr(name).is_some_and(|v| !v.trim().is_empty()));

    let mut signals = SignalCollector::default();
    if let Some(body) = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name().eq_ignore_ascii_case("body"))
    {
        signals.walk(body, false, false);
    }

    let result = signals.finish(lang_attribute);
    debug!(
        "Semantics: {} (coverage {}%, div ratio {:.2}, {} link issues)",
        result.classification,
        result.landmarks.coverage_percent,
        result.div_ratio,
        result.link_issues
    );
    result
}

#[derive(Debug, Default)]
struct SignalCollector {
    total_elements: usize,
    generic_containers: usize,
    covered_elements: usize,
    landmarks: BTreeSet<String>,
    heading_levels: Vec<u8>,
    link_issues: usize,
    images: ImageStats,
    lists: ListStats,
    tables: TableStats,
    time_elements: TimeStats,
}

impl SignalCollector {
    fn walk(&mut self, parent: ElementRef<'_>, in_landmark: bool, in_figure: bool) {
        for element in parent.children().filter_map(ElementRef::wrap) {
            let tag = element.value().name().to_ascii_lowercase();
            if is_noise(&tag) {
                continue;
            }

            let role = element.value().attr("role");
            let landmark = landmark_region(&tag, role);
            if let Some(region) = landmark {
                self.landmarks.insert(region.to_string());
            }

            let covered = in_landmark || landmark.is_some();
            let figure = in_figure || is_figure(&tag, role);

            self.total_elements += 1;
            if covered {
                self.covered_elements += 1;
            }
            self.record(element, &tag, in_figure);

            self.walk(element, covered, figure);
        }
    }

    fn record(&mut self, element: ElementRef<'_>, tag: &str, in_figure: bool) {
        if is_generic_container(tag) {
            self.generic_containers += 1;
        }
        if let Some(level) = heading_level(tag) {
            self.heading_levels.push(level);
        }
        if is_list(tag) {
            self.lists.total += 1;
        }

        match tag {
            "a" if element.value().attr("href").is_some() => {
                let text: String = element.text().collect();
                if is_generic_link_text(&text) {
                    self.link_issues += 1;
                }
            }
            "img" => {
                self.images.total += 1;
                match element.value().attr("alt") {
                    None => self.images.missing_alt += 1,
                    Some(alt) if alt.trim().is_empty() => self.images.empty_alt += 1,
                    Some(_) => self.images.with_alt += 1,
                }
                if in_figure {
                    self.images.in_figure += 1;
                }
            }
            "table" => {
                self.tables.total += 1;
                let has_header_cell = element
                    .descendants()
                    .filter_map(ElementRef::wrap)
                    .any(|d| d.value().name().eq_ignore_ascii_case("th"));
                if has_header_cell {
                    self.tables.with_headers += 1;
                }
            }
            "time" => {
                self.time_elements.total += 1;
                if element
                    .value()
                    .attr("datetime")
                    .is_some_and(is_machine_datetime)
                {
                    self.time_elements.with_datetime += 1;
                }
            }
            _ => {}
        }
    }

    fn finish(self, lang_attribute: bool) -> SemanticResult {
        let headings = HeadingStats {
            h1_count: self.heading_levels.iter().filter(|&&l| l == 1).count(),
            has_skips: has_heading_skips(&self.heading_levels),
        };

        let coverage_percent = if self.landmarks.is_empty() || self.total_elements == 0 {
            0
        } else {
            let pct = (self.covered_elements as f64 / self.total_elements as f64 * 100.0).round();
            pct.clamp(0.0, 100.0) as u8
        };

        let div_ratio = if self.total_elements == 0 {
            0.0
        } else {
            (self.generic_containers as f64 / self.total_elements as f64).clamp(0.0, 1.0)
        };

        SemanticResult {
            classification: classify(&headings, coverage_percent, div_ratio),
            headings,
            landmarks: LandmarkStats {
                found: self.landmarks,
                coverage_percent,
            },
            div_ratio,
            link_issues: self.link_issues,
            images: self.images,
            lists: self.lists,
            tables: self.tables,
            time_elements: self.time_elements,
            lang_attribute,
        }
    }
}

/// A skip is any step down the outline by more than one level (h1 -> h3).
/// Moving back up (h4 -> h2) is never a skip.
pub fn has_heading_skips(levels: &[u8]) -> bool {
    levels.windows(2).any(|pair| pair[1] > pair[0] + 1)
}

/// Accepts the `datetime` forms a machine can parse unambiguously: RFC 3339
/// instants, local date-times, dates, year-months, years, times of day and
/// ISO 8601 durations.
pub fn is_machine_datetime(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }

    if DateTime::parse_from_rfc3339(v).is_ok() {
        return true;
    }

    const LOCAL_DATETIME: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    if LOCAL_DATETIME
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(v, fmt).is_ok())
    {
        return true;
    }

    if NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok() {
        return true;
    }
    if v.len() == 7 && NaiveDate::parse_from_str(&format!("{v}-01"), "%Y-%m-%d").is_ok() {
        return true;
    }
    if v.len() == 4 && v.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    if ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(v, fmt).is_ok())
    {
        return true;
    }

    is_iso_duration(v)
}

/// `P[nY][nM][nW][nD][T[nH][nM][n[.n]S]]` with at least one component.
fn is_iso_duration(v: &str) -> bool {
    let Some(rest) = v.strip_prefix('P') else {
        return false;
    };

    let mut seen_component = false;
    let mut digits = 0;
    let mut in_time = false;

    for c in rest.chars() {
        match c {
            '0'..='9' | '.' => digits += 1,
            'T' if !in_time && digits == 0 => in_time = true,
            'Y' | 'W' | 'D' if !in_time && digits > 0 => {
                seen_component = true;
                digits = 0;
            }
            'M' if digits > 0 => {
                seen_component = true;
                digits = 0;
            }
            'H' | 'S' if in_time && digits > 0 => {
                seen_component = true;
                digits = 0;
            }
            _ => return false,
        }
    }

    seen_component && digits == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SemanticClassification;

    fn page(body: &str) -> String {
        format!(r#"<!doctype html><html lang="en"><head><title>t</title></head><body>{body}</body></html>"#)
    }

    #[test]
    fn test_heading_skips() {
        assert!(!has_heading_skips(&[1, 2, 3]));
        assert!(has_heading_skips(&[1, 3]));
        assert!(!has_heading_skips(&[1, 2, 3, 2, 3, 1, 2]));
        assert!(!has_heading_skips(&[2]));
        assert!(!has_heading_skips(&[]));
    }

    #[test]
    fn test_heading_signals_from_markup() {
        let result = analyze_semantics(&page("<h1>A</h1><h2>B</h2><h4>C</h4>"));

        assert_eq!(result.headings.h1_count, 1);
        assert!(result.headings.has_skips);
    }

    #[test]
    fn test_landmark_coverage() {
        // 4 elements, nav + a covered.
        let html = page(r#"<nav><a href="/">Home</a></nav><div><p>loose</p></div>"#);
        let result = analyze_semantics(&html);

        assert_eq!(result.landmarks.coverage_percent, 50);
        assert_eq!(result.landmarks.found.iter().collect::<Vec<_>>(), vec!["nav"]);
    }

    #[test]
    fn test_role_landmarks_count() {
        let html = page(r#"<div role="main"><p>x</p></div><div role="contentinfo"></div>"#);
        let result = analyze_semantics(&html);

        assert_eq!(result.landmarks.coverage_percent, 100);
        assert!(result.landmarks.found.contains("main"));
        assert!(result.landmarks.found.contains("footer"));
    }

    #[test]
    fn test_no_landmarks_means_zero_coverage() {
        let result = analyze_semantics(&page("<div><p>a</p></div>"));
        assert_eq!(result.landmarks.coverage_percent, 0);
        assert!(result.landmarks.found.is_empty());
    }

    #[test]
    fn test_div_ratio_bounds() {
        assert_eq!(analyze_semantics(&page("")).div_ratio, 0.0);
        assert_eq!(
            analyze_semantics(&page("<div><span></span><div></div></div>")).div_ratio,
            1.0
        );
    }

    #[test]
    fn test_link_issues() {
        let html = page(
            r#"<a href="/a">Click here</a>
               <a href="/b">   </a>
               <a href="/c">Quarterly report (PDF)</a>
               <a name="anchor"></a>"#,
        );

        assert_eq!(analyze_semantics(&html).link_issues, 2);
    }

    #[test]
    fn test_images() {
        let html = page(
            r#"<img src="a.png" alt="Chart of sales">
               <img src="b.png" alt="">
               <img src="c.png">
               <figure><img src="d.png" alt="Team photo"><figcaption>Team</figcaption></figure>"#,
        );

        let images = analyze_semantics(&html).images;
        assert_eq!(images.total, 4);
        assert_eq!(images.with_alt, 2);
        assert_eq!(images.empty_alt, 1);
        assert_eq!(images.missing_alt, 1);
        assert_eq!(images.in_figure, 1);
    }

    #[test]
    fn test_lists_tables_times() {
        let html = page(
            r#"<ul><li>a</li></ul><ol><li>b</li></ol><dl><dt>c</dt><dd>d</dd></dl>
               <table><thead><tr><th>H</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>
               <table><tr><td>no header</td></tr></table>
               <time datetime="2024-03-01">March 1</time>
               <time datetime="last tuesday">Tuesday</time>
               <time>soon</time>"#,
        );

        let result = analyze_semantics(&html);
        assert_eq!(result.lists.total, 3);
        assert_eq!(result.tables.total, 2);
        assert_eq!(result.tables.with_headers, 1);
        assert_eq!(result.time_elements.total, 3);
        assert_eq!(result.time_elements.with_datetime, 1);
    }

    #[test]
    fn test_lang_attribute() {
        assert!(analyze_semantics(&page("<p>x</p>")).lang_attribute);
        assert!(!analyze_semantics("<html><body><p>x</p></body></html>").lang_attribute);
        assert!(!analyze_semantics(r#"<html lang=" "><body></body></html>"#).lang_attribute);
    }

    #[test]
    fn test_machine_datetimes() {
        for ok in [
            "2024-03-01T10:00:00Z",
            "2024-03-01T10:00:00+02:00",
            "2024-03-01T10:00",
            "2024-03-01",
            "2024-03",
            "2024",
            "14:30",
            "PT2H30M",
            "P3D",
        ] {
            assert!(is_machine_datetime(ok), "{ok} should parse");
        }
        for bad in ["", "yesterday", "03/01/2024", "2024-13-01", "P", "PT", "P2H"] {
            assert!(!is_machine_datetime(bad), "{bad} should not parse");
        }
    }

    #[test]
    fn test_explicit_document() {
        let html = page(
            r#"<header><h1>Site</h1></header>
               <nav><ul><li><a href="/docs">Documentation</a></li></ul></nav>
               <main><article><h2>Post</h2><p>Text</p></article></main>
               <footer><p>Contact</p></footer>"#,
        );

        let result = analyze_semantics(&html);
        assert_eq!(result.landmarks.coverage_percent, 100);
        assert_eq!(result.classification, SemanticClassification::Explicit);
    }

    #[test]
    fn test_div_soup_is_opaque() {
        let html = page(r#"<div><div><h1>Title</h1></div><div><span>x</span></div></div>"#);
        assert_eq!(
            analyze_semantics(&html).classification,
            SemanticClassification::Opaque
        );
    }

    #[test]
    fn test_noise_elements_are_not_counted() {
        let result = analyze_semantics("<body><div></div><script>x()</script><style>p{}</style></body>");
        assert_eq!(result.div_ratio, 1.0);

        let result = analyze_semantics(
            r#"<body><main><p>a</p></main><noscript><p>b</p></noscript><svg><path d="M0"/></svg></body>"#,
        );
        assert_eq!(result.landmarks.coverage_percent, 100);
    }
}
