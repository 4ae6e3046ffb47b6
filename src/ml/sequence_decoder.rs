// ============================================================
// Layer 5 — Sequence Label Decoder (greedy CTC)
// ============================================================
// Turns a (T, V) matrix of per-timestep class probabilities
// into a label string using best-path decoding:
//
//   1. arg-max every row               [1,1,0,2,2,2,0]
//   2. squeeze runs of equal indices   [1,0,2,0]
//   3. drop the blank index            [1,2]
//   4. map indices to symbols          "ab"
//
// Squeezing runs BEFORE blanks are removed is what lets a
// model spell a double letter: [1,0,1] → "aa", while [1,1] → "a".
//
// Rows are only read, never normalised; any non-negative
// scores work since only the arg-max matters.

use ndarray::{ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::{alphabet::Alphabet, error::DecodeError};
use crate::ml::argmax;

/// Decoded label sequence for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedText {
    pub text: String,

    /// Mean arg-max probability over the emitted timesteps,
    /// 0.0 when nothing was emitted
    pub confidence: f32,
}

/// Greedy CTC decoder bound to one alphabet.
#[derive(Debug, Clone)]
pub struct SequenceLabelDecoder {
    alphabet:    Alphabet,
    blank_index: usize,
}

impl SequenceLabelDecoder {
    /// Fails if `blank_index` does not name a symbol of `alphabet`.
    pub fn new(alphabet: Alphabet, blank_index: usize) -> Result<Self, DecodeError> {
        check_blank(&alphabet, blank_index)?;
        Ok(Self { alphabet, blank_index })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Arg-max class and its probability for every timestep.
    ///
    /// Ties go to the lowest index; a NaN wins its row the way
    /// NumPy's arg-max picks the first NaN. Rows with no classes
    /// contribute nothing.
    pub fn best_path(probabilities: ArrayView2<f32>) -> Vec<(usize, f32)> {
        probabilities
            .axis_iter(Axis(0))
            .filter_map(|row| argmax(row.iter()))
            .collect()
    }

    /// Keep the first element of every run of equal class indices.
    /// Blank runs are squeezed like any other.
    pub fn squeeze(mut path: Vec<(usize, f32)>) -> Vec<(usize, f32)> {
        path.dedup_by_key(|(index, _)| *index);
        path
    }

    pub fn decode_with_confidence(
        &self,
        probabilities: ArrayView2<f32>,
    ) -> Result<DecodedText, DecodeError> {
        emit(&self.alphabet, self.blank_index, probabilities)
    }

    /// Decode a (B, T, V) batch, one result per batch element.
    pub fn decode_batch(
        &self,
        probabilities: ArrayView3<f32>,
    ) -> Result<Vec<DecodedText>, DecodeError> {
        probabilities
            .axis_iter(Axis(0))
            .map(|matrix| self.decode_with_confidence(matrix))
            .collect()
    }
}

/// Decode one probability matrix against `alphabet`.
///
/// The alphabet must already contain the blank at `blank_index`;
/// build it with [`Alphabet::with_blank`] when the model's
/// character list does not include one.
// Library entry point; the CLI decodes whole batches instead.
#[cfg_attr(not(test), allow(dead_code))]
pub fn decode(
    probabilities: ArrayView2<f32>,
    alphabet:      &Alphabet,
    blank_index:   usize,
) -> Result<String, DecodeError> {
    check_blank(alphabet, blank_index)?;
    Ok(emit(alphabet, blank_index, probabilities)?.text)
}

fn check_blank(alphabet: &Alphabet, blank_index: usize) -> Result<(), DecodeError> {
    if blank_index >= alphabet.len() {
        return Err(DecodeError::BlankOutOfRange {
            blank_index,
            len: alphabet.len(),
        });
    }
    Ok(())
}

fn emit(
    alphabet:      &Alphabet,
    blank_index:   usize,
    probabilities: ArrayView2<f32>,
) -> Result<DecodedText, DecodeError> {
    let path = SequenceLabelDecoder::squeeze(SequenceLabelDecoder::best_path(probabilities));

    let mut text       = String::new();
    let mut prob_sum   = 0.0f32;
    let mut kept       = 0usize;

    for (index, prob) in path.into_iter().filter(|(index, _)| *index != blank_index) {
        let symbol = alphabet.symbol(index).ok_or(DecodeError::IndexOutOfAlphabet {
            index,
            len: alphabet.len(),
        })?;
        text.push_str(symbol);
        prob_sum += prob;
        kept += 1;
    }

    let confidence = if kept == 0 { 0.0 } else { prob_sum / kept as f32 };

    tracing::debug!(
        "Decoded {} timesteps into {} symbols (conf={:.4})",
        probabilities.nrows(),
        kept,
        confidence
    );

    Ok(DecodedText { text, confidence })
}
