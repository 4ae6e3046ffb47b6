// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// A document the question is asked against. By the time a
// Document exists its text has been pulled out of whatever
// file format it was stored in; answer offsets index into
// `text` directly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// File name, reported alongside the answer
    pub source: String,

    /// Full text; answer byte offsets point into this string
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }
}
