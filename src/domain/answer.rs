// ============================================================
// Layer 3 — Answer Span Domain Types
// ============================================================
// Extractive Q&A never generates text: the model points at a
// SPAN of the document it was shown. These types carry that
// span through the pipeline:
//
//   SpanLogits       raw start/end scores for one window
//        │  select_best_span (Layer 5)
//        ▼
//   SpanScore        best span in WINDOW-LOCAL positions
//        │  translate(token_offset)
//        ▼
//   AnswerCandidate  span in DOCUMENT positions + its text
//        │
//        ▼
//   BestAnswer       keeps the top candidate over all windows

use serde::{Deserialize, Serialize};

/// Start/end logits the model produced for one window.
/// Both vectors cover every position of the window input,
/// including [CLS], question tokens, [SEP] and padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanLogits {
    pub start_logits: Vec<f32>,
    pub end_logits:   Vec<f32>,
}

/// The best span inside one window's context range.
///
/// `start` and `end` are inclusive and relative to
/// `context_start_idx`, so 0 is the first context token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanScore {
    /// start_prob * end_prob, always within [0, 1]
    pub score: f32,
    pub start: usize,
    pub end:   usize,
}

impl SpanScore {
    /// Shift both indices by `offset` (the window's first token
    /// position in the document's token stream).
    pub fn translate(self, offset: usize) -> Self {
        Self {
            score: self.score,
            start: self.start + offset,
            end:   self.end + offset,
        }
    }
}

/// A span expressed against the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub score: f32,

    /// First and last token of the answer in the document's token stream
    pub start: usize,
    pub end:   usize,

    /// Byte range of the answer inside the document text
    pub char_start: usize,
    pub char_end:   usize,

    pub text: String,

    /// Document the answer came from
    pub source: String,

    /// Ordinal of the window that produced it
    pub window: usize,
}

/// Running best-of-N over independent window results.
///
/// A candidate replaces the held one only when its score is
/// strictly higher, so on exact ties the first one seen wins.
#[derive(Debug, Default)]
pub struct BestAnswer {
    best: Option<AnswerCandidate>,
}

impl BestAnswer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate. Returns true if it became the new best.
    pub fn offer(&mut self, candidate: AnswerCandidate) -> bool {
        let replace = match &self.best {
            None          => true,
            Some(current) => candidate.score > current.score,
        };
        if replace {
            self.best = Some(candidate);
        }
        replace
    }

    pub fn into_inner(self) -> Option<AnswerCandidate> {
        self.best
    }
}
