// ============================================================
// Layer 3 — Model Input Windows
// ============================================================
// A long document does not fit in one model input, so it is
// cut into overlapping token windows. Each window is laid out
// the usual extractive-QA way:
//
//   position:  0      1..=q      q+1    q+2 .. q+2+c   then
//             [CLS]  question   [SEP]  context slice   [SEP] [PAD]...
//
// `context_start_idx..context_end_idx` marks the context slice,
// `token_offset` says where that slice starts in the document's
// own token stream.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Position of this window across everything scored for one question
    pub ordinal: usize,

    /// Index of the first context token in the document token stream
    pub token_offset: usize,

    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,

    /// Context slice inside `input_ids`, end exclusive
    pub context_start_idx: usize,
    pub context_end_idx:   usize,
}

/// All windows for one document, plus the byte offsets of every
/// document token so spans can be mapped back to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlan {
    pub source:  String,
    pub windows: Vec<Window>,

    /// (start, end) byte range of each document token
    pub offsets: Vec<(usize, usize)>,
}

impl WindowPlan {
    /// Byte range covering document tokens `start..=end`.
    pub fn char_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let (char_start, _) = *self.offsets.get(start)?;
        let (_, char_end)   = *self.offsets.get(end)?;
        Some((char_start, char_end))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_span_joins_token_ranges() {
        let plan = WindowPlan {
            source:  "doc".into(),
            windows: Vec::new(),
            offsets: vec![(0, 3), (4, 9), (10, 14)],
        };
        assert_eq!(plan.char_span(1, 2), Some((4, 14)));
        assert_eq!(plan.char_span(0, 0), Some((0, 3)));
        assert_eq!(plan.char_span(2, 3), None);
    }
}
