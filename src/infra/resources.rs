// ============================================================
// Layer 6 — Static Resources
// ============================================================
// Reads the files the decoders depend on:
//   - character dictionaries (one symbol per line)
//   - recorded model outputs (JSON)
//
// Loaded once at startup and handed to the decoders explicitly.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

use crate::domain::alphabet::Alphabet;

/// Load an alphabet from a dictionary file, one symbol per line.
///
/// Line endings are stripped but nothing else is trimmed: a line
/// holding a single space is the space symbol. Pass `prepend_blank`
/// when the dictionary does not already start with a blank entry.
pub fn load_alphabet(path: &Path, prepend_blank: Option<&str>) -> Result<Alphabet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read alphabet from '{}'", path.display()))?;

    let symbols = content.lines().map(|line| line.trim_end_matches('\r'));
    let alphabet = match prepend_blank {
        Some(blank) => Alphabet::with_blank(blank, symbols),
        None        => Alphabet::new(symbols),
    };

    tracing::info!(
        "Loaded alphabet of {} symbols from '{}'",
        alphabet.len(),
        path.display()
    );
    Ok(alphabet)
}

/// Deserialise a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Cannot parse JSON in '{}'", path.display()))
}
