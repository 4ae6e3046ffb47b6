// ============================================================
// Layer 5 — Answer Span Selector
// ============================================================
// Picks the best answer span in one window from independent
// start and end logits:
//
//   1. softmax start and end logits over the WHOLE window
//   2. keep only the context slice [context_start, context_end)
//   3. M[i, j] = p_start[i] * p_end[j]
//   4. zero j < i              (end before start)
//   5. zero j - i > max_span   (answer too long)
//   6. arg-max of M, first occurrence in row-major order
//
// Returned indices are local to the context slice; mapping them
// to document positions is the caller's job (see SpanScore::translate).

use ndarray::{s, Array1, Array2, ArrayView1};

use crate::domain::{
    answer::{SpanLogits, SpanScore},
    error::SpanError,
};
use crate::ml::argmax;

/// Numerically stable softmax: exp(x - max) / sum(exp(x - max)).
///
/// Infinite logits are taken as limits: the `+inf` entries share
/// all the mass, and a row of nothing but `-inf` is uniform.
pub fn softmax(logits: ArrayView1<f32>) -> Array1<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max == f32::INFINITY {
        let peaks = logits.iter().filter(|&&x| x == f32::INFINITY).count() as f32;
        return logits.mapv(|x| if x == f32::INFINITY { 1.0 / peaks } else { 0.0 });
    }
    if max == f32::NEG_INFINITY {
        return Array1::from_elem(logits.len(), 1.0 / logits.len() as f32);
    }
    let exp = logits.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Best span of at most `max_span_length` tokens past its start
/// inside `[context_start_idx, context_end_idx)`.
pub fn select_best_span(
    start_logits:      ArrayView1<f32>,
    end_logits:        ArrayView1<f32>,
    context_start_idx: usize,
    context_end_idx:   usize,
    max_span_length:   usize,
) -> Result<SpanScore, SpanError> {
    if start_logits.len() != end_logits.len() {
        return Err(SpanError::LengthMismatch {
            start: start_logits.len(),
            end:   end_logits.len(),
        });
    }
    if context_start_idx > context_end_idx {
        return Err(SpanError::InvertedContext {
            start: context_start_idx,
            end:   context_end_idx,
        });
    }
    if context_end_idx > start_logits.len() {
        return Err(SpanError::ContextOutOfBounds {
            end: context_end_idx,
            len: start_logits.len(),
        });
    }
    if context_start_idx == context_end_idx {
        return Err(SpanError::EmptyContext { start: context_start_idx });
    }
    check_not_nan("start", start_logits)?;
    check_not_nan("end", end_logits)?;

    let start_probs = softmax(start_logits);
    let end_probs   = softmax(end_logits);
    let starts = start_probs.slice(s![context_start_idx..context_end_idx]);
    let ends   = end_probs.slice(s![context_start_idx..context_end_idx]);
    let len    = starts.len();

    let mut scores = Array2::from_shape_fn((len, len), |(i, j)| starts[i] * ends[j]);
    for ((i, j), value) in scores.indexed_iter_mut() {
        if j < i || j - i > max_span_length {
            *value = 0.0;
        }
    }

    let (flat, score) = argmax(scores.iter())
        .ok_or(SpanError::EmptyContext { start: context_start_idx })?;

    Ok(SpanScore {
        score,
        start: flat / len,
        end:   flat % len,
    })
}

fn check_not_nan(which: &'static str, logits: ArrayView1<f32>) -> Result<(), SpanError> {
    match logits.iter().position(|x| x.is_nan()) {
        Some(index) => Err(SpanError::NanLogit { which, index }),
        None        => Ok(()),
    }
}

/// Span selection with a fixed maximum answer length.
#[derive(Debug, Clone, Copy)]
pub struct SpanSelector {
    max_span_length: usize,
}

impl SpanSelector {
    pub fn new(max_span_length: usize) -> Self {
        Self { max_span_length }
    }

    pub fn select(
        &self,
        logits:            &SpanLogits,
        context_start_idx: usize,
        context_end_idx:   usize,
    ) -> Result<SpanScore, SpanError> {
        select_best_span(
            ArrayView1::from(logits.start_logits.as_slice()),
            ArrayView1::from(logits.end_logits.as_slice()),
            context_start_idx,
            context_end_idx,
            self.max_span_length,
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, Array1};
    use proptest::prelude::*;

    /// Logits whose softmax equals `probs` (when probs sums to 1).
    fn logits_for(probs: &[f32]) -> Array1<f32> {
        probs.iter().map(|p| p.ln()).collect()
    }

    const START: [f32; 5] = [0.1, 0.6, 0.1, 0.1, 0.1];
    const END:   [f32; 5] = [0.05, 0.05, 0.7, 0.1, 0.1];

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(arr1(&[1.0, 2.0, 3.0]).view());
        assert!((p.sum() - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_softmax_handles_large_logits() {
        let p = softmax(arr1(&[1000.0, 1000.0]).view());
        assert!((p[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_softmax_infinite_logits_are_limits() {
        let p = softmax(arr1(&[f32::INFINITY, 0.0, f32::INFINITY]).view());
        assert_eq!(p.to_vec(), vec![0.5, 0.0, 0.5]);

        let p = softmax(arr1(&[f32::NEG_INFINITY; 4]).view());
        assert_eq!(p.to_vec(), vec![0.25; 4]);
    }

    #[test]
    fn test_infinite_logits_still_give_a_probability() {
        let inf = arr1(&[f32::INFINITY, 0.0, 0.0]);
        let span = select_best_span(inf.view(), inf.view(), 0, 3, 2).unwrap();
        assert_eq!((span.start, span.end), (0, 0));
        assert_eq!(span.score, 1.0);

        let masked = arr1(&[f32::NEG_INFINITY; 3]);
        let span = select_best_span(masked.view(), masked.view(), 0, 3, 2).unwrap();
        assert!((0.0..=1.0).contains(&span.score));
        assert_eq!((span.start, span.end), (0, 0));
    }

    #[test]
    fn test_masked_padding_is_ignored() {
        let start = arr1(&[0.0, 2.0, 0.0, f32::NEG_INFINITY, f32::NEG_INFINITY]);
        let end   = arr1(&[0.0, 0.0, 2.0, f32::NEG_INFINITY, f32::NEG_INFINITY]);
        let span = select_best_span(start.view(), end.view(), 0, 3, 4).unwrap();
        assert_eq!((span.start, span.end), (1, 2));
        assert!(span.score.is_finite());
    }

    #[test]
    fn test_nan_logit_is_rejected() {
        let good = arr1(&[0.0, 1.0, 0.0]);
        let bad  = arr1(&[0.0, f32::NAN, 0.0]);
        assert_eq!(
            select_best_span(good.view(), bad.view(), 0, 3, 2),
            Err(SpanError::NanLogit { which: "end", index: 1 })
        );
    }

    #[test]
    fn test_peak_span_is_selected() {
        let span = select_best_span(
            logits_for(&START).view(),
            logits_for(&END).view(),
            0, 5, 2,
        ).unwrap();
        assert_eq!((span.start, span.end), (1, 2));
        assert!((span.score - 0.42).abs() < 1e-5);
    }

    #[test]
    fn test_zero_max_span_keeps_only_diagonal() {
        let span = select_best_span(
            logits_for(&START).view(),
            logits_for(&END).view(),
            0, 5, 0,
        ).unwrap();
        assert_eq!(span.start, span.end);
        // diagonal products: .005 .03 .07 .01 .01
        assert_eq!(span.start, 2);
        assert!((span.score - 0.07).abs() < 1e-5);
    }

    #[test]
    fn test_end_before_start_is_never_chosen() {
        // both peaks are strong but in the wrong order
        let start = logits_for(&[0.05, 0.05, 0.05, 0.8, 0.05]);
        let end   = logits_for(&[0.05, 0.8, 0.05, 0.05, 0.05]);
        let span = select_best_span(start.view(), end.view(), 0, 5, 4).unwrap();
        assert!(span.start <= span.end);
        assert!(span.score < 0.8 * 0.8);
    }

    #[test]
    fn test_question_positions_are_excluded() {
        // Position 0 ([CLS]) and 1 (question) hold most of the mass,
        // but only positions 2..5 are context.
        let start = arr1(&[9.0, 8.0, 0.0, 3.0, 0.0]);
        let end   = arr1(&[9.0, 8.0, 0.0, 0.0, 3.0]);
        let span = select_best_span(start.view(), end.view(), 2, 5, 16).unwrap();
        // local (1, 2) == window positions 3 and 4
        assert_eq!((span.start, span.end), (1, 2));
        assert!(span.score < 0.01);
    }

    #[test]
    fn test_long_span_is_cut_by_max_span_length() {
        let start = logits_for(&[0.9, 0.025, 0.025, 0.025, 0.025]);
        let end   = logits_for(&[0.025, 0.025, 0.025, 0.025, 0.9]);
        let wide = select_best_span(start.view(), end.view(), 0, 5, 4).unwrap();
        assert_eq!((wide.start, wide.end), (0, 4));

        let narrow = select_best_span(start.view(), end.view(), 0, 5, 3).unwrap();
        assert!(narrow.end - narrow.start <= 3);
        assert_ne!((narrow.start, narrow.end), (0, 4));
    }

    #[test]
    fn test_max_span_beyond_context_is_noop() {
        let a = select_best_span(logits_for(&START).view(), logits_for(&END).view(), 0, 5, 4).unwrap();
        let b = select_best_span(logits_for(&START).view(), logits_for(&END).view(), 0, 5, 100).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_uniform_logits_tie_to_first_cell() {
        let flat = Array1::<f32>::zeros(4);
        let span = select_best_span(flat.view(), flat.view(), 0, 4, 3).unwrap();
        assert_eq!((span.start, span.end), (0, 0));
    }

    #[test]
    fn test_single_token_context() {
        let flat = Array1::<f32>::zeros(3);
        let span = select_best_span(flat.view(), flat.view(), 1, 2, 16).unwrap();
        assert_eq!((span.start, span.end), (0, 0));
        assert!((span.score - 1.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_contract_violations_are_rejected() {
        let four = Array1::<f32>::zeros(4);
        let five = Array1::<f32>::zeros(5);

        assert_eq!(
            select_best_span(four.view(), five.view(), 0, 4, 2),
            Err(SpanError::LengthMismatch { start: 4, end: 5 })
        );
        assert_eq!(
            select_best_span(four.view(), four.view(), 3, 1, 2),
            Err(SpanError::InvertedContext { start: 3, end: 1 })
        );
        assert_eq!(
            select_best_span(four.view(), four.view(), 2, 2, 2),
            Err(SpanError::EmptyContext { start: 2 })
        );
        assert_eq!(
            select_best_span(four.view(), four.view(), 0, 6, 2),
            Err(SpanError::ContextOutOfBounds { end: 6, len: 4 })
        );
    }

    #[test]
    fn test_selector_reads_recorded_logits() {
        let logits = SpanLogits {
            start_logits: logits_for(&START).to_vec(),
            end_logits:   logits_for(&END).to_vec(),
        };
        let span = SpanSelector::new(2).select(&logits, 0, 5).unwrap();
        assert_eq!((span.start, span.end), (1, 2));
    }

    /// Mostly finite logits, with the odd masked or saturated position.
    fn logit() -> impl Strategy<Value = f32> {
        prop_oneof![
            8 => -20.0f32..20.0,
            1 => Just(f32::INFINITY),
            1 => Just(f32::NEG_INFINITY),
        ]
    }

    /// Window length, then a context range inside it, then logits.
    fn span_case() -> impl Strategy<Value = (Vec<f32>, Vec<f32>, usize, usize, usize)> {
        (1usize..24).prop_flat_map(|n| {
            (
                prop::collection::vec(logit(), n),
                prop::collection::vec(logit(), n),
                0..n,
                1..=n,
                0usize..8,
            )
                .prop_map(|(s, e, a, b, max_span)| {
                    let (lo, hi) = if a < b { (a, b) } else { (b.saturating_sub(1), a + 1) };
                    (s, e, lo, hi, max_span)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_span_is_valid_and_bounded((s, e, lo, hi, max_span) in span_case()) {
            let span = select_best_span(arr1(&s).view(), arr1(&e).view(), lo, hi, max_span).unwrap();
            prop_assert!(span.start <= span.end);
            prop_assert!(span.end - span.start <= max_span);
            prop_assert!(span.end < hi - lo);
            prop_assert!((0.0..=1.0).contains(&span.score));
        }

        #[test]
        fn prop_selection_is_deterministic((s, e, lo, hi, max_span) in span_case()) {
            let a = select_best_span(arr1(&s).view(), arr1(&e).view(), lo, hi, max_span);
            let b = select_best_span(arr1(&s).view(), arr1(&e).view(), lo, hi, max_span);
            prop_assert_eq!(a, b);
        }
    }
}
