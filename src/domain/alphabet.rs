// ============================================================
// Layer 3 — Label Alphabet
// ============================================================
// The ordered symbol table a sequence-labelling model predicts
// over. Position i in a probability row corresponds to
// symbols[i].
//
// Convention: index 0 is the CTC blank. Character lists that
// ship with recognition models usually do NOT contain it, so
// the caller prepends one with `Alphabet::with_blank` before
// decoding.
//
// The alphabet is built once and passed explicitly to whatever
// needs it — there is no process-wide vocabulary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    symbols: Vec<String>,
}

impl Alphabet {
    /// Use the symbols exactly as given (blank already included).
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Prepend `blank` at index 0, shifting every other symbol up by one.
    pub fn with_blank<I, S>(blank: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = vec![blank.into()];
        all.extend(symbols.into_iter().map(Into::into));
        Self { symbols: all }
    }

    pub fn symbol(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}
