// ============================================================
// Layer 4 — Token Windower
// ============================================================
// Splits a long document into overlapping model inputs.
//
// A QA model accepts at most `max_seq_len` tokens, and the
// question plus three special tokens take their share:
//
//   capacity = max_seq_len - question_tokens - 3
//   overlap  = floor(capacity * window_overlap)   (< capacity)
//   stride   = capacity - overlap
//
// Example with capacity=4, window_overlap=0.5 (stride 2):
//   Document tokens: t0 t1 t2 t3 t4 t5 t6 t7 t8 t9
//   Window 0:        t0 t1 t2 t3
//   Window 1:              t2 t3 t4 t5
//   Window 2:                    t4 t5 t6 t7
//   Window 3:                          t6 t7 t8 t9
//
// Every answer no longer than the overlap appears whole in at
// least one window. The tokenizer's byte offsets are kept so
// spans can be cut back out of the original text.

use tokenizers::Tokenizer;

use crate::domain::{
    document::Document,
    error::WindowError,
    window::{Window, WindowPlan},
};

/// Ids of the framing tokens, looked up in the tokenizer with
/// the BERT ids as fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub cls: u32,
    pub sep: u32,
    pub pad: u32,
}

impl SpecialTokens {
    pub fn from_tokenizer(tokenizer: &Tokenizer) -> Self {
        Self {
            cls: tokenizer.token_to_id("[CLS]").unwrap_or(101),
            sep: tokenizer.token_to_id("[SEP]").unwrap_or(102),
            pad: tokenizer.token_to_id("[PAD]").unwrap_or(0),
        }
    }
}

pub struct Windower {
    tokenizer:      Tokenizer,
    special:        SpecialTokens,
    max_seq_len:    usize,
    window_overlap: f32,
}

impl Windower {
    /// Truncation and padding configured in the tokenizer are
    /// switched off: windowing needs every document token.
    pub fn new(
        mut tokenizer:  Tokenizer,
        max_seq_len:    usize,
        window_overlap: f32,
    ) -> Result<Self, WindowError> {
        if !(0.0..1.0).contains(&window_overlap) {
            return Err(WindowError::InvalidOverlap(window_overlap));
        }
        tokenizer
            .with_truncation(None)
            .map_err(|e| WindowError::Tokenize(e.to_string()))?;
        tokenizer.with_padding(None);

        let special = SpecialTokens::from_tokenizer(&tokenizer);
        Ok(Self { tokenizer, special, max_seq_len, window_overlap })
    }

    #[cfg(test)]
    pub fn special_tokens(&self) -> SpecialTokens {
        self.special
    }

    /// Token ids of the question, without special tokens.
    pub fn encode_question(&self, question: &str) -> Result<Vec<u32>, WindowError> {
        let enc = self
            .tokenizer
            .encode(question, false)
            .map_err(|e| WindowError::Tokenize(e.to_string()))?;
        Ok(enc.get_ids().to_vec())
    }

    /// Context tokens per window once the question is in place.
    pub fn capacity(&self, question_tokens: usize) -> Result<usize, WindowError> {
        self.max_seq_len
            .checked_sub(question_tokens + 3)
            .filter(|c| *c > 0)
            .ok_or(WindowError::NoContextCapacity {
                max_seq_len: self.max_seq_len,
                question_tokens,
            })
    }

    /// Cut `document` into windows, numbering them from `first_ordinal`.
    /// An empty document yields a plan with no windows.
    pub fn plan(
        &self,
        question_ids:  &[u32],
        document:      &Document,
        first_ordinal: usize,
    ) -> Result<WindowPlan, WindowError> {
        let capacity = self.capacity(question_ids.len())?;
        let overlap  = ((capacity as f32 * self.window_overlap).floor() as usize).min(capacity - 1);
        let stride   = capacity - overlap;

        let enc = self
            .tokenizer
            .encode(document.text.as_str(), false)
            .map_err(|e| WindowError::Tokenize(e.to_string()))?;
        let ids = enc.get_ids();
        let total = ids.len();

        let mut windows = Vec::new();
        let mut start = 0usize;
        while start < total {
            let end = (start + capacity).min(total);
            windows.push(self.frame(question_ids, &ids[start..end], start, first_ordinal + windows.len()));
            if end == total {
                break;
            }
            start += stride;
        }

        tracing::debug!(
            "{}: {} tokens → {} windows (capacity={}, stride={})",
            document.source,
            total,
            windows.len(),
            capacity,
            stride
        );

        Ok(WindowPlan {
            source: document.source.clone(),
            windows,
            offsets: enc.get_offsets().to_vec(),
        })
    }

    /// [CLS] question [SEP] context [SEP] followed by padding.
    fn frame(&self, question: &[u32], context: &[u32], token_offset: usize, ordinal: usize) -> Window {
        let context_start_idx = question.len() + 2;
        let context_end_idx   = context_start_idx + context.len();
        let used = context_end_idx + 1;
        let len  = used.max(self.max_seq_len);

        let mut input_ids = Vec::with_capacity(len);
        input_ids.push(self.special.cls);
        input_ids.extend_from_slice(question);
        input_ids.push(self.special.sep);
        input_ids.extend_from_slice(context);
        input_ids.push(self.special.sep);
        input_ids.resize(len, self.special.pad);

        let attention_mask = (0..len).map(|i| u32::from(i < used)).collect();
        let token_type_ids = (0..len)
            .map(|i| u32::from(i >= context_start_idx && i < used))
            .collect();

        Window {
            ordinal,
            token_offset,
            input_ids,
            attention_mask,
            token_type_ids,
            context_start_idx,
            context_end_idx,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::build_word_level;
    use tokenizers::{PaddingParams, PaddingStrategy, TruncationParams};

    const TEN_WORDS: &str = "w0 w1 w2 w3 w4 w5 w6 w7 w8 w9";

    fn windower(max_seq_len: usize, overlap: f32) -> Windower {
        let tok = build_word_level(&[TEN_WORDS, "when"], 100).unwrap();
        Windower::new(tok, max_seq_len, overlap).unwrap()
    }

    #[test]
    fn test_overlapping_windows_cover_document() {
        // 1 question token + 3 specials + 4 context tokens
        let w = windower(8, 0.5);
        let q = w.encode_question("when").unwrap();
        let plan = w.plan(&q, &Document::new("d", TEN_WORDS), 0).unwrap();

        let offsets: Vec<usize> = plan.windows.iter().map(|w| w.token_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
        let last = plan.windows.last().unwrap();
        assert_eq!(last.context_end_idx - last.context_start_idx, 4);
        assert_eq!(plan.offsets.len(), 10);
    }

    #[test]
    fn test_tokenizer_truncation_and_padding_are_ignored() {
        let mut tok = build_word_level(&[TEN_WORDS, "when"], 100).unwrap();
        tok.with_truncation(Some(TruncationParams { max_length: 4, ..Default::default() }))
            .unwrap();
        tok.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(16),
            ..Default::default()
        }));
        assert_eq!(tok.encode(TEN_WORDS, false).unwrap().get_ids().len(), 16);

        let w = Windower::new(tok, 8, 0.5).unwrap();
        let q = w.encode_question("when").unwrap();
        assert_eq!(q.len(), 1);

        let plan = w.plan(&q, &Document::new("d", TEN_WORDS), 0).unwrap();
        assert_eq!(plan.offsets.len(), 10);
        let offsets: Vec<usize> = plan.windows.iter().map(|w| w.token_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_window_layout() {
        let w = windower(10, 0.5);
        let q = w.encode_question("when").unwrap();
        let plan = w.plan(&q, &Document::new("d", "w0 w1 w2"), 0).unwrap();
        assert_eq!(plan.windows.len(), 1);

        let win = &plan.windows[0];
        let sp = w.special_tokens();
        assert_eq!(win.input_ids.len(), 10);
        assert_eq!(win.input_ids[0], sp.cls);
        assert_eq!(win.input_ids[2], sp.sep);
        assert_eq!(win.input_ids[6], sp.sep);
        assert_eq!(win.input_ids[7], sp.pad);
        assert_eq!((win.context_start_idx, win.context_end_idx), (3, 6));
        assert_eq!(win.attention_mask, vec![1, 1, 1, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(win.token_type_ids, vec![0, 0, 0, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn test_zero_overlap_tiles_document() {
        let w = windower(8, 0.0);
        let q = w.encode_question("when").unwrap();
        let plan = w.plan(&q, &Document::new("d", TEN_WORDS), 5).unwrap();
        let offsets: Vec<usize> = plan.windows.iter().map(|w| w.token_offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        let ordinals: Vec<usize> = plan.windows.iter().map(|w| w.ordinal).collect();
        assert_eq!(ordinals, vec![5, 6, 7]);
    }

    #[test]
    fn test_high_overlap_still_advances() {
        // capacity 2, overlap floor(2 * 0.9) = 1 → stride 1
        let w = windower(6, 0.9);
        let q = w.encode_question("when").unwrap();
        let plan = w.plan(&q, &Document::new("d", "w0 w1 w2 w3"), 0).unwrap();
        assert_eq!(plan.windows.len(), 3);
    }

    #[test]
    fn test_empty_document_has_no_windows() {
        let w = windower(8, 0.5);
        let q = w.encode_question("when").unwrap();
        let plan = w.plan(&q, &Document::new("d", ""), 0).unwrap();
        assert!(plan.windows.is_empty());
    }

    #[test]
    fn test_question_too_long_is_rejected() {
        let w = windower(4, 0.5);
        let q = w.encode_question("when").unwrap();
        assert_eq!(
            w.plan(&q, &Document::new("d", TEN_WORDS), 0),
            Err(WindowError::NoContextCapacity { max_seq_len: 4, question_tokens: 1 })
        );
    }

    #[test]
    fn test_overlap_outside_unit_interval_is_rejected() {
        let tok = build_word_level(&[TEN_WORDS], 100).unwrap();
        assert!(matches!(
            Windower::new(tok, 8, 1.0),
            Err(WindowError::InvalidOverlap(_))
        ));
    }
}
