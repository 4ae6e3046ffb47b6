// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between this crate and the things it does NOT own:
//
//   DocumentSource  — where the text to search comes from
//   SpanScorer      — the model that scores a window
//                     (an external inference runtime)
//   QuestionAnswerer — the end-to-end "ask" workflow
//
// The application layer is written against these traits only,
// so tests can swap in scripted scorers.

use anyhow::Result;

use crate::domain::{
    answer::{AnswerCandidate, SpanLogits},
    document::Document,
    window::Window,
};

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Anything that can produce the documents a question is asked against.
///
/// Implementations:
///   - DocumentLoader → .docx / .txt files on disk
pub trait DocumentSource {
    fn load_all(&self) -> Result<Vec<Document>>;
}

// ─── SpanScorer ───────────────────────────────────────────────────────────────
/// The inference call: turns one window into start/end logits.
///
/// Both logit vectors must have one entry per `window.input_ids`
/// position.
///
/// Implementations:
///   - RecordedScorer → replays saved model outputs by window ordinal
pub trait SpanScorer {
    fn score(&self, window: &Window) -> Result<SpanLogits>;
}

// ─── QuestionAnswerer ─────────────────────────────────────────────────────────
/// Any component that can answer a question over a set of documents.
/// `Ok(None)` means no answer was found, which is not an error.
pub trait QuestionAnswerer {
    fn answer(&self, question: &str, documents: &[Document]) -> Result<Option<AnswerCandidate>>;
}
