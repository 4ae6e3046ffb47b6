// ============================================================
// Layer 2 — Answer Use Case
// ============================================================
// Extractive Q&A over documents longer than one model input:
//
//   Step 1: Tokenize the question once             (Layer 4)
//   Step 2: Cut every document into windows        (Layer 4)
//   Step 3: Score each window (external model)     (Layer 5)
//   Step 4: Best span per window                   (Layer 5)
//   Step 5: Window → document tokens → byte range  (Layer 3)
//   Step 6: Keep the single best candidate         (Layer 3)
//
// Window ordinals run across all documents in load order, so
// a recorded-logits file lines up with the `windows` plan.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::windower::Windower;
use crate::domain::{
    answer::{AnswerCandidate, BestAnswer},
    document::Document,
    traits::{QuestionAnswerer, SpanScorer},
    window::{Window, WindowPlan},
};
use crate::ml::span_selector::SpanSelector;

// ─── Answer Configuration ─────────────────────────────────────────────────────
// Tunable knobs of the windowing and span search. Missing fields
// in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Model input length in tokens, special tokens included
    pub max_seq_len: usize,

    /// Largest allowed end - start of an answer, in tokens
    pub max_span_length: usize,

    /// Fraction of a window's context shared with the next window
    pub window_overlap: f32,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            max_seq_len:     384,
            max_span_length: 16,
            window_overlap:  0.5,
        }
    }
}

impl AnswerConfig {
    pub fn validate(self) -> Result<Self> {
        ensure!(self.max_seq_len > 0, "max_seq_len must be greater than 0");
        ensure!(
            (0.0..1.0).contains(&self.window_overlap),
            "window_overlap must be within [0, 1), got {}",
            self.window_overlap
        );
        Ok(self)
    }
}

// ─── AnswerUseCase ────────────────────────────────────────────────────────────
pub struct AnswerUseCase<S> {
    windower: Windower,
    selector: SpanSelector,
    scorer:   S,
}

impl<S: SpanScorer> AnswerUseCase<S> {
    pub fn new(config: &AnswerConfig, tokenizer: Tokenizer, scorer: S) -> Result<Self> {
        let config   = config.clone().validate()?;
        let windower = Windower::new(tokenizer, config.max_seq_len, config.window_overlap)?;
        let selector = SpanSelector::new(config.max_span_length);
        Ok(Self { windower, selector, scorer })
    }

    /// Window plans for every document, ordinals numbered globally.
    pub fn plan(&self, question: &str, documents: &[Document]) -> Result<Vec<WindowPlan>> {
        let question_ids = self.windower.encode_question(question)?;

        let mut plans = Vec::with_capacity(documents.len());
        let mut next_ordinal = 0usize;
        for doc in documents {
            let plan = self
                .windower
                .plan(&question_ids, doc, next_ordinal)
                .with_context(|| format!("Cannot split '{}' into windows", doc.source))?;
            next_ordinal += plan.windows.len();
            plans.push(plan);
        }

        tracing::info!("Planned {} windows over {} documents", next_ordinal, documents.len());
        Ok(plans)
    }

    fn candidate(
        &self,
        window:   &Window,
        plan:     &WindowPlan,
        document: &Document,
    ) -> Result<AnswerCandidate> {
        let logits = self.scorer.score(window)?;
        let local = self
            .selector
            .select(&logits, window.context_start_idx, window.context_end_idx)
            .with_context(|| format!("Cannot select a span in window {}", window.ordinal))?;
        let span = local.translate(window.token_offset);

        let (char_start, char_end) = plan
            .char_span(span.start, span.end)
            .with_context(|| format!("Tokens {}..={} have no offsets", span.start, span.end))?;
        let text = document
            .text
            .get(char_start..char_end)
            .with_context(|| format!("Byte range {char_start}..{char_end} is not valid text"))?
            .to_string();

        tracing::debug!(
            "Window {} span [{},{}] conf={:.4} answer='{}'",
            window.ordinal,
            span.start,
            span.end,
            span.score,
            text
        );

        Ok(AnswerCandidate {
            score: span.score,
            start: span.start,
            end: span.end,
            char_start,
            char_end,
            text,
            source: document.source.clone(),
            window: window.ordinal,
        })
    }
}

impl<S: SpanScorer> QuestionAnswerer for AnswerUseCase<S> {
    fn answer(&self, question: &str, documents: &[Document]) -> Result<Option<AnswerCandidate>> {
        let plans = self.plan(question, documents)?;

        let mut best = BestAnswer::new();
        for (plan, doc) in plans.iter().zip(documents) {
            for window in &plan.windows {
                best.offer(self.candidate(window, plan, doc)?);
            }
        }

        let best = best.into_inner();
        match &best {
            Some(c) => tracing::info!(
                "Best answer from '{}' window {} (score {:.4})",
                c.source,
                c.window,
                c.score
            ),
            None => tracing::info!("No window produced an answer"),
        }
        Ok(best)
    }
}
