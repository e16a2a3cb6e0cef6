use std::sync::LazyLock;

use regex::Regex;

/// Whole-line boilerplate. A line matching any of these carries no
/// maintenance content and is dropped before chunking.
static BOILERPLATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Bare page numbers and other numeric noise.
        r"^(\d+\s*)*$",
        r"^.$",
        // Commonly occurring document boilerplate.
        r"^Section$",
        r"^Issue Date:$",
        r"^Dated\s*:.*$",
        r"^Change\(s\):$",
        r"^Issue:?$",
        r"^Issued by:?.*$",
        r"^(Page:\s*)?\d+\s+of\s+\d+.*$",
        r"^.*Table of Contents.*$",
        r"^.*(\.\s*){4,}.*$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("invalid boilerplate pattern"))
    .collect()
});

/// Inline legal phrases removed from otherwise-valid lines, up to their
/// terminating period.
static STRIPPED_PHRASES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"This\s*document\s*is\s*controlled\s*while\s*it\s*remains[^.]*?\.",
        r"Once\s*this\s*no\s*longer\s*applies[^.]*\.",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("invalid phrase pattern"))
    .collect()
});

/// Filters one line of raw extracted text. Returns `None` for empty lines
/// and known boilerplate; otherwise the trimmed line with the inline
/// legal phrases removed.
pub fn normalize_line(line: &str) -> Option<String> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return None;
    }

    if BOILERPLATE_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(trimmed))
    {
        return None;
    }

    let mut text = trimmed.to_string();
    for phrase in STRIPPED_PHRASES.iter() {
        text = phrase.replace_all(&text, "").into_owned();
    }

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
