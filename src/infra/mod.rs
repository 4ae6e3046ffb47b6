// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of the
// other layers:
//
//   tokenizer_store.rs — loads tokenizer.json, or generates a
//                        word-level tokenizer from the corpus
//
//   config_store.rs    — saves/loads the AnswerConfig a window
//                        plan was built with
//
//   resources.rs       — alphabets (one symbol per line) and
//                        recorded model outputs (JSON)

/// Tokenizer loading and word-level generation
pub mod tokenizer_store;

/// AnswerConfig persistence
pub mod config_store;

/// Alphabet and JSON resource readers
pub mod resources;
