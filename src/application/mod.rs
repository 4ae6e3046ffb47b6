// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one goal each:
//
//   decode_use_case.rs — class probabilities in, text out
//   answer_use_case.rs — question + documents in, best span out
//
// No decoding math here (Layer 5) and no printing (Layer 1).

/// CTC text recognition workflow
pub mod decode_use_case;

/// Multi-window extractive answer workflow
pub mod answer_use_case;
