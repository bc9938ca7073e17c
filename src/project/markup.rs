//! Interactive element extraction from markup files.
//!
//! Parses HTML-like sources (plain HTML, JSP, Vue templates, JSX) with a
//! forgiving HTML5 parser and summarizes the elements a UI test would
//! target: inputs, buttons, anchors, selects and textareas.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::error::ProjectError;

/// Tags reported by [`extract_selectors`].
pub const INTERACTIVE_TAGS: &[&str] = &["input", "button", "a", "select", "textarea"];

/// Maximum number of characters kept from an element's text.
pub const MAX_TEXT_CHARS: usize = 50;

/// Identifying attributes of one interactive element.
///
/// Absent or empty attributes are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorRecord {
    /// Tag name, lower-cased.
    pub tag: String,
    /// `id` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `name` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `class` attribute split into tokens, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    /// `type` attribute.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Trimmed visible text, at most [`MAX_TEXT_CHARS`] characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SelectorRecord {
    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let attr = |name: &str| {
            value
                .attr(name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let class = value
            .attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            tag: value.name().to_string(),
            id: attr("id"),
            name: attr("name"),
            class,
            input_type: attr("type"),
            text: visible_text(element),
        }
    }
}

/// Summary of the interactive elements of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    /// File name without its directory.
    pub file: String,
    /// Number of entries in `selectors`.
    pub total_elements: usize,
    /// Elements in document order.
    pub selectors: Vec<SelectorRecord>,
    /// Fragments the parser had to recover from.
    #[serde(skip)]
    pub skipped_fragments: usize,
}

/// Reads `path` and extracts its interactive elements.
pub fn extract_selectors(path: impl AsRef<Path>) -> Result<PageSummary, ProjectError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ProjectError::Parse(format!("{}: {}", path.display(), e)))?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let summary = extract_from_str(&file, &content)?;
    if summary.skipped_fragments > 0 {
        tracing::debug!(
            "{}: parser recovered from {} malformed fragment(s)",
            path.display(),
            summary.skipped_fragments
        );
    }
    Ok(summary)
}

/// Extracts interactive elements from already loaded markup.
pub fn extract_from_str(file: &str, content: &str) -> Result<PageSummary, ProjectError> {
    let selector = Selector::parse(&INTERACTIVE_TAGS.join(", "))
        .map_err(|e| ProjectError::Parse(e.to_string()))?;

    let document = Html::parse_document(content);
    let selectors: Vec<SelectorRecord> = document
        .select(&selector)
        .map(SelectorRecord::from_element)
        .collect();

    Ok(PageSummary {
        file: file.to_string(),
        total_elements: selectors.len(),
        selectors,
        skipped_fragments: document.errors.len(),
    })
}

/// Renders the outcome as the JSON object handed to the orchestrator:
/// the summary, or `{"error": ...}`.
pub fn summary_to_json(result: &Result<PageSummary, ProjectError>) -> serde_json::Value {
    match result {
        Ok(summary) => serde_json::to_value(summary)
            .unwrap_or_else(|e| serde_json::json!({ "error": format!("Could not parse file: {}", e) })),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

/// Text nodes are trimmed individually and joined with single spaces, so
/// `Save <b>now</b>` reads "Save now" rather than "Savenow".
fn visible_text(element: ElementRef<'_>) -> Option<String> {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        None
    } else {
        Some(joined.chars().take(MAX_TEXT_CHARS).collect())
    }
}
