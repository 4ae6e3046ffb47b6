// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the concepts
// of the system. Rules for this layer:
//   - no file I/O
//   - no tokenizer or CLI types
//   - only data, contracts and their errors

/// Contract-violation errors (thiserror)
pub mod error;

/// The one concrete model-output type (shape + flat f32 data)
pub mod tensor;

/// Ordered label alphabet with the CTC blank convention
pub mod alphabet;

/// A loaded document
pub mod document;

/// Model input windows over a long document
pub mod window;

/// Span scores, answer candidates and the best-answer accumulator
pub mod answer;

/// Seams to external collaborators
pub mod traits;
