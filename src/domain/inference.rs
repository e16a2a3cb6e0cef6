use std::collections::BTreeSet;

/// A retrieved passage with its provenance. Page numbers are one-based
/// here; the storage layer keeps them zero-based and the retrieval
/// service shifts them when mapping index hits to sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceSource {
    pub text: String,
    pub file_name: String,
    pub file_hash: String,
    pub start_page_no: u32,
    pub end_page_no: u32,
}

impl InferenceSource {
    /// Citation string shown to the engineer, e.g. `manual.pdf, p. 3` or
    /// `manual.pdf, pp. 3-5`.
    pub fn citation(&self) -> String {
        if self.start_page_no == self.end_page_no {
            format!("{}, p. {}", self.file_name, self.start_page_no)
        } else {
            format!(
                "{}, pp. {}-{}",
                self.file_name, self.start_page_no, self.end_page_no
            )
        }
    }
}

/// The answer to one inference request. `sources` is empty when no
/// retrieval was performed or retrieval returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceResult {
    pub text: String,
    pub sources: Vec<InferenceSource>,
}

impl InferenceResult {
    /// Renders the answer followed by a sorted, de-duplicated citation
    /// list. The answer is returned verbatim when there are no sources.
    pub fn to_markdown(&self) -> String {
        if self.sources.is_empty() {
            return self.text.clone();
        }

        let citations: BTreeSet<String> = self
            .sources
            .iter()
            .map(|source| format!("- {}", source.citation()))
            .collect();

        let listing = citations.into_iter().collect::<Vec<_>>().join("\n");

        format!("{}\n\n----------\n\n{}", self.text, listing)
    }
}
