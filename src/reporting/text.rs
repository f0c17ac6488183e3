// src/reporting/text.rs
//! Terminal and JSON rendering of analysis results.

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write;
use url::Url;

use super::interpretation::{interpretations, Interpretation};
use super::signals::{
    insights, percent, semantic_signals, semantics_description, semantics_tooltip,
    structural_signals, structure_description, structure_tooltip, Insight, Signal,
    SEMANTICS_HEADING_TOOLTIP, STRUCTURE_HEADING_TOOLTIP,
};
use crate::analysis::SignalStatus;
use crate::history::HistoryEntry;
use crate::models::{AnalysisResult, SemanticClassification, StructureClassification};

fn marker(status: SignalStatus) -> ColoredString {
    match status {
        SignalStatus::Good => "✓".green(),
        SignalStatus::Warning => "○".yellow(),
        SignalStatus::Issue => "–".dimmed(),
    }
}

fn structure_label(classification: StructureClassification) -> ColoredString {
    match classification {
        StructureClassification::Deterministic => classification.as_str().cyan().bold(),
        _ => classification.as_str().yellow().bold(),
    }
}

fn semantics_label(classification: SemanticClassification) -> ColoredString {
    match classification {
        SemanticClassification::Explicit => classification.as_str().green().bold(),
        SemanticClassification::Partial => classification.as_str().yellow().bold(),
        SemanticClassification::Opaque => classification.as_str().red().bold(),
    }
}

fn push_signals(out: &mut String, title: &str, subtitle: &str, items: &[Signal]) {
    let _ = writeln!(out, "{}", title.bold().underline());
    let _ = writeln!(out, "{}", subtitle.dimmed());
    for item in items {
        let _ = writeln!(out, "  {} {}", marker(item.status), item.text);
    }
    out.push('\n');
}

fn push_insights(out: &mut String, items: &[Insight]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", "Insights".bold().underline());
    for insight in items {
        let _ = writeln!(
            out,
            "  {} {}",
            insight.title.bold(),
            format!("[{}]", insight.category).dimmed()
        );
        let _ = writeln!(out, "    {}", insight.description);
    }
}

fn push_interpretations(out: &mut String, items: &[Interpretation]) {
    let _ = writeln!(out, "{}", "Interpretation".bold().underline());
    for item in items {
        let _ = writeln!(
            out,
            "  {} {}",
            format!("{}:", item.category).bold(),
            item.finding
        );
        let _ = writeln!(out, "    {}", item.implication);
        if let Some(baseline) = item.baseline {
            let _ = writeln!(out, "    {}", baseline.dimmed().italic());
        }
    }
    out.push('\n');
}

/// Full human-readable report for one run of `fetches` samples.
pub fn render_text(result: &AnalysisResult, fetches: usize) -> String {
    let mut out = String::new();
    let structure = &result.structure;
    let semantics = &result.semantics;

    let _ = writeln!(out, "{} {}\n", "Signals for".bold(), result.url.cyan());

    let _ = writeln!(
        out,
        "{:<10} {}  {}",
        "Structure".bold(),
        structure_label(structure.classification),
        structure_description(structure.classification)
    );
    let _ = writeln!(
        out,
        "{:<10} {}  {}\n",
        "Semantics".bold(),
        semantics_label(semantics.classification),
        semantics_description(semantics.classification)
    );

    push_signals(
        &mut out,
        "Structural Signals",
        "How consistently the page renders its DOM tree across requests.",
        &structural_signals(structure, fetches),
    );
    push_signals(
        &mut out,
        "Semantic Signals",
        "How much meaning is carried by markup rather than presentation.",
        &semantic_signals(semantics),
    );

    push_interpretations(&mut out, &interpretations(structure, semantics, fetches));
    push_insights(&mut out, &insights(structure, semantics));
    out
}

/// Glossary shown by `--explain`.
pub fn render_explanations(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Structure".bold());
    let _ = writeln!(out, "  {}", STRUCTURE_HEADING_TOOLTIP);
    let _ = writeln!(
        out,
        "  {}",
        structure_tooltip(result.structure.classification)
    );
    let _ = writeln!(out, "{}", "Semantics".bold());
    let _ = writeln!(out, "  {}", SEMANTICS_HEADING_TOOLTIP);
    let _ = writeln!(
        out,
        "  {}",
        semantics_tooltip(result.semantics.classification)
    );
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    fetches: usize,
    structural_signals: Vec<Signal>,
    semantic_signals: Vec<Signal>,
    interpretations: Vec<Interpretation>,
    insights: Vec<Insight>,
}

/// Pretty JSON of the result plus the derived signal lists.
pub fn render_json(result: &AnalysisResult, fetches: usize) -> serde_json::Result<String> {
    let report = JsonReport {
        result,
        fetches,
        structural_signals: structural_signals(&result.structure, fetches),
        semantic_signals: semantic_signals(&result.semantics),
        interpretations: interpretations(&result.structure, &result.semantics, fetches),
        insights: insights(&result.structure, &result.semantics),
    };
    serde_json::to_string_pretty(&report)
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Side-by-side metric table, one column per recorded run.
pub fn render_comparison(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Metric")];
    header.extend((1..=entries.len()).map(|i| Cell::new(format!("Analysis {}", i))));
    table.set_header(header);

    let mut row = |label: &str, value: &dyn Fn(&HistoryEntry) -> String| {
        let mut cells = vec![label.to_string()];
        cells.extend(entries.iter().map(value));
        table.add_row(cells);
    };

    row("URL", &|e| host_of(&e.url));
    row("Timestamp", &|e| {
        e.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    });
    row("Structure", &|e| {
        e.result.structure.classification.to_string()
    });
    row("Difference Count", &|e| {
        e.result.structure.difference_count.to_string()
    });
    row("Semantics", &|e| {
        e.result.semantics.classification.to_string()
    });
    row("H1 Count", &|e| {
        e.result.semantics.headings.h1_count.to_string()
    });
    row("Has Heading Skips", &|e| {
        let skips = if e.result.semantics.headings.has_skips { "Yes" } else { "No" };
        skips.to_string()
    });
    row("Landmark Coverage", &|e| {
        format!("{}%", e.result.semantics.landmarks.coverage_percent)
    });
    row("Div/Span Ratio", &|e| {
        format!("{}%", percent(e.result.semantics.div_ratio))
    });
    row("Link Issues", &|e| e.result.semantics.link_issues.to_string());

    table
}
