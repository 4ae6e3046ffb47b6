// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From files on disk to model-ready inputs:
//
//   .txt / .docx files
//       │
//       ▼
//   DocumentLoader   → reads files, extracts text
//       │
//       ▼
//   Windower         → tokenizes, cuts overlapping windows,
//                      keeps token → byte offsets
//       │
//       ▼
//   WindowPlan       → handed to the model (Layer 5 scorer)

/// Loads .txt and .docx documents
pub mod loader;

/// Overlapping token windows for long documents
pub mod windower;
