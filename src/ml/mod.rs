// ============================================================
// Layer 5 — Model Output Decoding
// ============================================================
// Everything that turns raw model numbers into results:
//
//   sequence_decoder.rs — greedy CTC decoding of (T, V)
//                         class probabilities into text
//
//   span_selector.rs    — softmax + masked outer product to
//                         find the best answer span in a window
//
//   scorer.rs           — replays recorded QA model outputs
//                         behind the SpanScorer trait
//
// The decoders are pure functions over ndarray views: no I/O,
// no shared state, safe to call from any thread.

/// Greedy best-path CTC label decoding
pub mod sequence_decoder;

/// Best start/end span selection within a context window
pub mod span_selector;

/// Recorded-logit scorer for the answer pipeline
pub mod scorer;

/// Index and value of the largest element.
///
/// Ties keep the first occurrence. A NaN is treated as larger
/// than everything, so the first NaN wins (NumPy arg-max rules).
/// Returns None for an empty input.
pub(crate) fn argmax<'a, I>(values: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = &'a f32>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.into_iter().enumerate() {
        if value.is_nan() {
            return Some((index, value));
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((index, value)),
        }
    }
    best
}
