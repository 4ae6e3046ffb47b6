// ============================================================
// Layer 3 — Contract Errors
// ============================================================
// Typed errors for caller-side contract violations in the
// decoding core. Degenerate but valid inputs (all-blank
// predictions, low-confidence spans) are NOT errors and
// never show up here.
//
// The outer layers wrap these in anyhow::Error with context.

use thiserror::Error;

/// Errors raised by the sequence label decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("blank index {blank_index} is outside the alphabet of {len} symbols")]
    BlankOutOfRange { blank_index: usize, len: usize },

    #[error("predicted class {index} has no symbol in an alphabet of {len} symbols")]
    IndexOutOfAlphabet { index: usize, len: usize },
}

/// Errors raised by the answer span selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    #[error("start logits have {start} entries but end logits have {end}")]
    LengthMismatch { start: usize, end: usize },

    #[error("context start {start} is after context end {end}")]
    InvertedContext { start: usize, end: usize },

    #[error("context range [{start}, {start}) is empty")]
    EmptyContext { start: usize },

    #[error("context end {end} exceeds window length {len}")]
    ContextOutOfBounds { end: usize, len: usize },

    #[error("{which} logit at position {index} is NaN")]
    NanLogit { which: &'static str, index: usize },
}

/// Errors raised while splitting a document into model windows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error(
        "max_seq_len {max_seq_len} leaves no room for context after \
         {question_tokens} question tokens and 3 special tokens"
    )]
    NoContextCapacity {
        max_seq_len:     usize,
        question_tokens: usize,
    },

    #[error("window overlap {0} must be within [0, 1)")]
    InvalidOverlap(f32),

    #[error("tokenizer failed: {0}")]
    Tokenize(String),
}

/// Errors raised while converting a recorded model output into an array.
#[derive(Debug, Error)]
pub enum TensorError {
    #[error("expected a tensor of rank {expected}, got shape {shape:?}")]
    Rank { expected: String, shape: Vec<usize> },

    #[error("shape {shape:?} needs {expected} values but {actual} were given")]
    DataLength {
        shape:    Vec<usize>,
        expected: usize,
        actual:   usize,
    },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
