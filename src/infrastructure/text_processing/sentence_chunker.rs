use std::sync::Arc;

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use crate::application::ports::{ChunkSplitter, ChunkSplitterError};
use crate::domain::LocalizedText;

use super::page_extractor::extract_pages;
use super::tokenizer::ChunkTokenizer;

/// Token-bounded, sentence-aware document chunker.
///
/// Re-joins the extracted pages into one document stream while recording
/// a page-offset index, splits the stream into overlapping
/// sentence-bounded chunks, and re-attributes every chunk to the page
/// range it spans. Every chunk is an exact substring of the stream.
#[derive(Clone)]
pub struct SentenceChunker {
    tokenizer: Arc<ChunkTokenizer>,
    chunk_size: usize,
    chunk_overlap: usize,
}

/// Byte range into the concatenated document stream.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

impl SentenceChunker {
    /// `chunk_size` and `chunk_overlap` are token counts measured with
    /// the injected tokenizer. The overlap must be strictly smaller than
    /// the chunk size.
    pub fn new(
        tokenizer: Arc<ChunkTokenizer>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<Self, ChunkSplitterError> {
        if chunk_size == 0 {
            return Err(ChunkSplitterError::InvalidConfiguration(
                "chunk_size must be positive".to_string(),
            ));
        }

        if chunk_overlap >= chunk_size {
            return Err(ChunkSplitterError::InvalidConfiguration(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            tokenizer,
            chunk_size,
            chunk_overlap,
        })
    }

    /// Chunks already-extracted pages. Exposed separately from
    /// [`ChunkSplitter::split_document`] so the splitting logic can be
    /// exercised without a parsed document.
    pub fn chunk_pages(&self, pages: &[LocalizedText]) -> Vec<LocalizedText> {
        let mut page_offset_index = Vec::with_capacity(pages.len());
        let mut document_text = String::new();

        for page in pages {
            document_text.push_str(&page.text);
            document_text.push('\n');
            page_offset_index.push(document_text.len());
        }

        let sentences = split_sentences(&document_text);
        let chunk_spans = self.merge_sentences(&document_text, &sentences);

        chunk_spans
            .into_iter()
            .filter(|span| !document_text[span.start..span.end].trim().is_empty())
            .map(|span| {
                LocalizedText::new(
                    document_text[span.start..span.end].to_string(),
                    find_page_no_by_offset(&page_offset_index, span.start),
                    find_page_no_by_offset(&page_offset_index, span.end),
                )
            })
            .collect()
    }

    fn split_blocking(&self, document_data: &[u8]) -> Result<Vec<LocalizedText>, ChunkSplitterError> {
        let pages =
            extract_pages(document_data).map_err(|e| ChunkSplitterError::Parse(e.to_string()))?;

        Ok(self.chunk_pages(&pages))
    }

    /// Greedy sentence packing with backward token overlap. Oversized
    /// sentences are pre-split so packing only ever sees units that fit
    /// into one chunk.
    fn merge_sentences(&self, text: &str, sentences: &[Span]) -> Vec<Span> {
        let mut units: Vec<(Span, usize)> = Vec::with_capacity(sentences.len());

        for span in sentences {
            let tokens = self.tokenizer.count(&text[span.start..span.end]);

            if tokens > self.chunk_size {
                for sub_span in self.split_oversized(text, *span) {
                    let sub_tokens = self.tokenizer.count(&text[sub_span.start..sub_span.end]);
                    units.push((sub_span, sub_tokens));
                }
            } else {
                units.push((*span, tokens));
            }
        }

        if units.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start_idx = 0;

        loop {
            let mut end_idx = start_idx;
            let mut total_tokens = units[start_idx].1;

            while end_idx + 1 < units.len() && total_tokens + units[end_idx + 1].1 <= self.chunk_size
            {
                end_idx += 1;
                total_tokens += units[end_idx].1;
            }

            chunks.push(Span {
                start: units[start_idx].0.start,
                end: units[end_idx].0.end,
            });

            if end_idx + 1 >= units.len() {
                break;
            }

            // Walk back from the end of this chunk until the overlap
            // budget is spent; the next chunk starts on a sentence
            // boundary inside the current one.
            let mut next_start = end_idx + 1;
            let mut overlap_tokens = 0;

            while next_start > start_idx + 1
                && overlap_tokens + units[next_start - 1].1 <= self.chunk_overlap
            {
                overlap_tokens += units[next_start - 1].1;
                next_start -= 1;
            }

            start_idx = next_start;
        }

        chunks
    }

    /// Splits a sentence exceeding the chunk size into character-bounded
    /// pieces, binary-searching the longest prefix that still fits.
    fn split_oversized(&self, text: &str, span: Span) -> Vec<Span> {
        let segment = &text[span.start..span.end];

        let char_offsets: Vec<usize> = segment
            .char_indices()
            .map(|(offset, _)| offset)
            .chain([segment.len()])
            .collect();
        let total_chars = char_offsets.len() - 1;

        let mut sub_spans = Vec::new();
        let mut from = 0;

        while from < total_chars {
            let remaining = total_chars - from;
            let mut low = 1;
            let mut high = remaining;
            let mut best = 1;

            while low <= high {
                let mid = low + (high - low) / 2;
                let candidate = &segment[char_offsets[from]..char_offsets[from + mid]];

                if self.tokenizer.count(candidate) <= self.chunk_size {
                    best = mid;
                    low = mid + 1;
                } else {
                    high = mid - 1;
                }
            }

            sub_spans.push(Span {
                start: span.start + char_offsets[from],
                end: span.start + char_offsets[from + best],
            });

            from += best;
        }

        sub_spans
    }
}

#[async_trait]
impl ChunkSplitter for SentenceChunker {
    async fn split_document(
        &self,
        document_data: &[u8],
    ) -> Result<Vec<LocalizedText>, ChunkSplitterError> {
        let chunker = self.clone();
        let data = document_data.to_vec();

        tokio::task::spawn_blocking(move || chunker.split_blocking(&data))
            .await
            .map_err(|e| ChunkSplitterError::SplittingFailed(format!("task join error: {e}")))?
    }
}

/// Splits text into trimmed sentence spans. A sentence ends at `.`, `!`,
/// or `?` followed by whitespace or the end of input.
fn split_sentences(text: &str) -> Vec<Span> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;

    let mut graphemes = text.grapheme_indices(true).peekable();

    while let Some((offset, grapheme)) = graphemes.next() {
        if start.is_none() {
            if grapheme.chars().all(char::is_whitespace) {
                continue;
            }
            start = Some(offset);
        }

        if matches!(grapheme, "." | "!" | "?") {
            let ends_sentence = match graphemes.peek() {
                Some((_, next)) => next.chars().all(char::is_whitespace),
                None => true,
            };

            if ends_sentence {
                if let Some(sentence_start) = start.take() {
                    sentences.push(Span {
                        start: sentence_start,
                        end: offset + grapheme.len(),
                    });
                }
            }
        }
    }

    // Trailing text without closing punctuation still forms a sentence.
    if let Some(sentence_start) = start {
        let end = text.trim_end().len();
        if end > sentence_start {
            sentences.push(Span {
                start: sentence_start,
                end,
            });
        }
    }

    sentences
}

/// Resolves an offset in the concatenated document stream to the position
/// of the page it falls on, by scanning for the first index entry beyond
/// the offset. Offsets past the recorded range resolve to 0.
fn find_page_no_by_offset(page_offset_index: &[usize], offset: usize) -> u32 {
    for (page_no, cumulative) in page_offset_index.iter().enumerate() {
        if *cumulative > offset {
            return page_no as u32;
        }
    }

    0
}
