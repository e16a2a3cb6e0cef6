use std::sync::Arc;

use aerodoc::domain::LocalizedText;
use aerodoc::infrastructure::text_processing::{
    extract_pages, ChunkTokenizer, SentenceChunker,
};

const DEFAULT_CHUNK_SIZE: usize = 640;
const DEFAULT_CHUNK_OVERLAP: usize = 60;
const TIGHT_CHUNK_SIZE: usize = 24;
const TIGHT_CHUNK_OVERLAP: usize = 8;

fn tokenizer() -> Arc<ChunkTokenizer> {
    Arc::new(ChunkTokenizer::cl100k().expect("tokenizer must initialize"))
}

fn page(text: &str, page_no: u32) -> LocalizedText {
    LocalizedText::single_page(text.to_string(), page_no)
}

#[test]
fn given_zero_chunk_size_when_constructing_then_configuration_is_rejected() {
    assert!(SentenceChunker::new(tokenizer(), 0, 0).is_err());
}

#[test]
fn given_overlap_equal_to_size_when_constructing_then_configuration_is_rejected() {
    assert!(SentenceChunker::new(tokenizer(), 10, 10).is_err());
    assert!(SentenceChunker::new(tokenizer(), 10, 20).is_err());
}

#[test]
fn given_valid_configuration_when_constructing_then_chunker_is_created() {
    assert!(SentenceChunker::new(tokenizer(), DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).is_ok());
}

#[test]
fn given_no_pages_when_chunking_then_no_chunks_are_produced() {
    let chunker =
        SentenceChunker::new(tokenizer(), DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();

    assert!(chunker.chunk_pages(&[]).is_empty());
}

#[test]
fn given_single_short_page_when_chunking_then_single_chunk_covers_the_page() {
    let chunker =
        SentenceChunker::new(tokenizer(), DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();

    let text = "The oil filter must be replaced every fifty hours. Use only approved filters.";
    let chunks = chunker.chunk_pages(&[page(text, 0)]);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
    assert_eq!(chunks[0].start_page_no, 0);
    assert_eq!(chunks[0].end_page_no, 0);
}

#[test]
fn given_small_pages_when_chunking_then_one_chunk_spans_all_pages() {
    let chunker =
        SentenceChunker::new(tokenizer(), DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();

    let chunks = chunker.chunk_pages(&[
        page("Remove the upper cowling before inspection.", 0),
        page("Inspect the exhaust springs for cracks.", 1),
    ]);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].start_page_no, 0);
    assert_eq!(chunks[0].end_page_no, 1);
}

#[test]
fn given_many_sentences_when_chunking_with_tight_limits_then_page_ranges_are_monotonic() {
    let chunker = SentenceChunker::new(tokenizer(), TIGHT_CHUNK_SIZE, TIGHT_CHUNK_OVERLAP).unwrap();

    let pages: Vec<LocalizedText> = (0..4)
        .map(|page_no| {
            page(
                &format!(
                    "Page {page_no} first sentence about the engine. \
                     Page {page_no} second sentence about the fuel system. \
                     Page {page_no} third sentence about the landing gear."
                ),
                page_no,
            )
        })
        .collect();

    let chunks = chunker.chunk_pages(&pages);

    assert!(chunks.len() > 1);

    for chunk in &chunks {
        assert!(chunk.start_page_no <= chunk.end_page_no);
        assert!(!chunk.text.trim().is_empty());
    }

    for window in chunks.windows(2) {
        assert!(
            window[1].start_page_no >= window[0].start_page_no,
            "chunk page ranges must be non-decreasing in document order"
        );
    }
}

#[test]
fn given_consecutive_chunks_when_chunking_with_overlap_then_chunks_share_text() {
    // Overlap budget comfortably above one sentence's token count, so
    // every chunk boundary pulls at least one sentence back in.
    let chunker = SentenceChunker::new(tokenizer(), 20, 12).unwrap();

    let text = "The first check covers the oil system. The second check covers the spark plugs. \
                The third check covers the fuel lines. The fourth check covers the propeller. \
                The fifth check covers the wing bolts.";

    let chunks = chunker.chunk_pages(&[page(text, 0)]);

    assert!(chunks.len() > 1);

    for window in chunks.windows(2) {
        let overlap_probe: String = window[1].text.chars().take(12).collect();
        assert!(
            window[0].text.contains(&overlap_probe),
            "consecutive chunks must overlap: {:?} not in {:?}",
            overlap_probe,
            window[0].text
        );
    }
}

#[test]
fn given_identical_input_when_chunking_twice_then_chunks_are_identical() {
    let chunker = SentenceChunker::new(tokenizer(), TIGHT_CHUNK_SIZE, TIGHT_CHUNK_OVERLAP).unwrap();

    let pages = vec![
        page("Drain the fuel system before removing the tank. Flush all lines.", 0),
        page("Refit the tank and torque the straps to specification.", 1),
    ];

    let first = chunker.chunk_pages(&pages);
    let second = chunker.chunk_pages(&pages);

    assert_eq!(first, second);
}

#[test]
fn given_sentence_exceeding_chunk_size_when_chunking_then_sentence_is_hard_split() {
    let chunker = SentenceChunker::new(tokenizer(), TIGHT_CHUNK_SIZE, TIGHT_CHUNK_OVERLAP).unwrap();

    // One long "sentence" with no closing punctuation.
    let words: Vec<String> = (0..120).map(|n| format!("word{n}")).collect();
    let text = words.join(" ");

    let chunks = chunker.chunk_pages(&[page(&text, 0)]);

    assert!(chunks.len() > 1);

    // Hard-split pieces are contiguous, so re-joining them restores the
    // original text.
    let rejoined: String = chunks.iter().map(|chunk| chunk.text.as_str()).collect();
    assert_eq!(rejoined, text);
}

#[test]
fn given_page_without_content_when_extracting_then_remaining_pages_keep_physical_numbers() {
    // Emulates a blank first page followed by a content page, as produced
    // by the page extractor: the empty page is skipped, the second page
    // keeps its physical zero-based number.
    let pages = vec![page("Lubricate the nose gear pivot points.", 1)];

    assert_eq!(pages[0].start_page_no, 1);
    assert_eq!(pages[0].end_page_no, 1);

    let chunker =
        SentenceChunker::new(tokenizer(), DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap();
    let chunks = chunker.chunk_pages(&pages);

    assert_eq!(chunks.len(), 1);
}

#[test]
fn given_unparseable_bytes_when_extracting_pages_then_parse_error_is_returned() {
    assert!(extract_pages(b"definitely not a pdf document").is_err());
}
