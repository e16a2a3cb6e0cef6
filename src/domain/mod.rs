mod document;
mod embedding;
mod inference;
mod interaction;
mod localized_text;

pub use document::DocumentRecord;
pub use embedding::Embedding;
pub use inference::{InferenceResult, InferenceSource};
pub use interaction::{InferenceInteraction, Originator};
pub use localized_text::LocalizedText;
