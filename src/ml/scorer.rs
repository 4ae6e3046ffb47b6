// ============================================================
// Layer 5 — Recorded Span Scorer
// ============================================================
// Replays start/end logits an external QA model produced for
// a window plan. The file is a JSON array with one entry per
// window ordinal:
//
//   [ { "start_logits": [...], "end_logits": [...] }, ... ]
//
// Produce it by feeding the output of `logit-decode windows`
// to the model, in order.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::domain::{answer::SpanLogits, traits::SpanScorer, window::Window};
use crate::infra::resources::read_json;

pub struct RecordedScorer {
    outputs: Vec<SpanLogits>,
}

impl RecordedScorer {
    pub fn new(outputs: Vec<SpanLogits>) -> Self {
        Self { outputs }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let outputs: Vec<SpanLogits> = read_json(path)
            .with_context(|| format!("Cannot load recorded logits from '{}'", path.display()))?;
        tracing::info!("Loaded recorded logits for {} windows", outputs.len());
        Ok(Self::new(outputs))
    }
}

impl SpanScorer for RecordedScorer {
    fn score(&self, window: &Window) -> Result<SpanLogits> {
        let Some(logits) = self.outputs.get(window.ordinal) else {
            bail!(
                "No recorded logits for window {} ({} recorded)",
                window.ordinal,
                self.outputs.len()
            );
        };

        let expected = window.input_ids.len();
        if logits.start_logits.len() != expected || logits.end_logits.len() != expected {
            bail!(
                "Window {} has {} positions but recorded logits have {} start / {} end",
                window.ordinal,
                expected,
                logits.start_logits.len(),
                logits.end_logits.len()
            );
        }

        Ok(logits.clone())
    }
}
