use std::sync::LazyLock;

use lopdf::Document;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::domain::LocalizedText;

use super::line_filter::normalize_line;

/// The input bytes could not be parsed as a PDF document.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse document: {0}")]
pub struct DocumentParseError(pub String);

static HYPHEN_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

/// Extracts one [`LocalizedText`] per page with non-empty content, tagged
/// with the physical zero-based page number. Pages whose text filters
/// down to nothing are skipped without renumbering the remaining pages.
pub fn extract_pages(document_data: &[u8]) -> Result<Vec<LocalizedText>, DocumentParseError> {
    let document =
        Document::load_mem(document_data).map_err(|e| DocumentParseError(e.to_string()))?;

    let mut pages = Vec::new();

    for (page_no, page_number) in document.get_pages().into_keys().enumerate() {
        let raw_text = document.extract_text(&[page_number]).unwrap_or_default();

        if let Some(page_text) = assemble_page_text(&raw_text) {
            pages.push(LocalizedText::single_page(page_text, page_no as u32));
        }
    }

    Ok(pages)
}

/// Cleans one page of raw extracted text: NFKC normalization, re-joining
/// of words hyphenated across line breaks, line-by-line boilerplate
/// filtering, and joining the surviving lines with single spaces.
fn assemble_page_text(raw_text: &str) -> Option<String> {
    let normalized: String = raw_text.nfkc().collect();
    let de_hyphenated = HYPHEN_BREAK.replace_all(&normalized, "$prefix$suffix");

    let lines: Vec<String> = de_hyphenated
        .lines()
        .filter_map(normalize_line)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}
