// ============================================================
// Layer 2 — Decode Use Case
// ============================================================
// Text recognition workflow:
//
//   Step 1: Load the alphabet            (Layer 6 - infra)
//   Step 2: Load the recorded output     (Layer 6 - infra)
//   Step 3: Reshape to (B, T, V)         (Layer 3 - domain)
//   Step 4: Greedy CTC decode per item   (Layer 5 - ml)

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::{alphabet::Alphabet, tensor::ModelOutput};
use crate::infra::resources::{load_alphabet, read_json};
use crate::ml::sequence_decoder::{DecodedText, SequenceLabelDecoder};

pub struct DecodeUseCase {
    decoder: SequenceLabelDecoder,
}

impl DecodeUseCase {
    pub fn new(alphabet: Alphabet, blank_index: usize) -> Result<Self> {
        let decoder = SequenceLabelDecoder::new(alphabet, blank_index)?;
        Ok(Self { decoder })
    }

    pub fn from_alphabet_file(
        path:          &Path,
        prepend_blank: Option<&str>,
        blank_index:   usize,
    ) -> Result<Self> {
        Self::new(load_alphabet(path, prepend_blank)?, blank_index)
    }

    /// Decode every batch element of one model output.
    pub fn run(&self, output: ModelOutput) -> Result<Vec<DecodedText>> {
        let batch = output.into_sequence_batch()?;
        let (items, steps, classes) = batch.dim();
        tracing::info!("Decoding {} sequences of {} steps x {} classes", items, steps, classes);

        if classes != self.decoder.alphabet().len() {
            tracing::warn!(
                "Model emits {} classes but the alphabet has {} symbols",
                classes,
                self.decoder.alphabet().len()
            );
        }

        Ok(self.decoder.decode_batch(batch.view())?)
    }

    pub fn run_file(&self, path: &Path) -> Result<Vec<DecodedText>> {
        let output: ModelOutput = read_json(path)?;
        self.run(output)
            .with_context(|| format!("Cannot decode '{}'", path.display()))
    }
}
