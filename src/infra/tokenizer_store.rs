// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Supplies the tokenizer whose offsets map answer spans back
// to document text.
//
// The normal case is a pretrained HuggingFace `tokenizer.json`
// matching the QA model. When no file exists yet, a word-level
// tokenizer is generated from the corpus and written out, so the
// same vocabulary is reused by later `windows` / `answer` runs.
//
// Special tokens follow the BERT convention:
//   [PAD]=0  [UNK]=1  [CLS]=101  [SEP]=102  [MASK]=103

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Map, Value};
use std::{collections::HashMap, fs, path::PathBuf, str::FromStr};
use tokenizers::normalizers::bert::BertNormalizer;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{
    Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer,
};

const SPECIAL_TOKENS: [(&str, u32); 5] = [
    ("[PAD]", 0),
    ("[UNK]", 1),
    ("[CLS]", 101),
    ("[SEP]", 102),
    ("[MASK]", 103),
];

const FIRST_WORD_ID: u32 = 104;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the tokenizer file, or build one from `texts` and save it.
    pub fn load_or_build(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        if self.path.exists() {
            self.load()
        } else {
            tracing::info!(
                "No tokenizer at '{}', building word-level vocabulary (vocab_size={})",
                self.path.display(),
                vocab_size
            );
            self.build_and_save(texts, vocab_size)
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", self.path.display(), e)
        })?;
        tracing::info!("Loaded tokenizer from '{}'", self.path.display());
        Ok(tokenizer)
    }

    fn build_and_save(&self, texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
        let definition = word_level_json(texts, vocab_size)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&definition)?)
            .with_context(|| format!("Cannot write tokenizer to '{}'", self.path.display()))?;

        tracing::info!("Tokenizer saved to '{}'", self.path.display());
        from_json(&definition)
    }
}

/// Build a word-level tokenizer in memory.
#[cfg(test)]
pub fn build_word_level(texts: &[&str], vocab_size: usize) -> Result<Tokenizer> {
    from_json(&word_level_json(texts, vocab_size)?)
}

fn from_json(definition: &Value) -> Result<Tokenizer> {
    Tokenizer::from_str(&definition.to_string())
        .map_err(|e| anyhow!("Cannot construct tokenizer: {e}"))
}

/// HuggingFace tokenizer JSON for a lowercase word-level vocabulary
/// holding the `vocab_size - 5` most frequent words of `texts`.
fn word_level_json(texts: &[&str], vocab_size: usize) -> Result<Value> {
    let freq = word_counts(texts)?;

    // Most frequent first; ties alphabetical so the ids are reproducible
    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

    let mut vocab = Map::new();
    for (token, id) in SPECIAL_TOKENS {
        vocab.insert(token.to_string(), json!(id));
    }
    for (id, (word, _)) in (FIRST_WORD_ID..).zip(words) {
        vocab.insert(word, json!(id));
    }

    let added_tokens: Vec<Value> = SPECIAL_TOKENS
        .iter()
        .map(|(token, id)| {
            json!({
                "id": id, "content": token, "single_word": false,
                "lstrip": false, "rstrip": false, "normalized": false, "special": true
            })
        })
        .collect();

    Ok(json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": added_tokens,
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": false,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    }))
}

/// Word frequencies, split exactly the way the generated tokenizer
/// will split: BertNormalizer (lowercase, accents kept) followed by
/// the Whitespace pre-tokenizer.
fn word_counts(texts: &[&str]) -> Result<HashMap<String, usize>> {
    let normalizer = BertNormalizer::new(true, true, Some(false), true);
    let mut freq: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let mut pre = PreTokenizedString::from(*text);
        pre.normalize(|s| normalizer.normalize(s))
            .map_err(|e| anyhow!("Cannot normalise corpus text: {e}"))?;
        Whitespace {}
            .pre_tokenize(&mut pre)
            .map_err(|e| anyhow!("Cannot pre-tokenize corpus text: {e}"))?;

        for (word, _, _) in pre.get_splits(OffsetReferential::Original, OffsetType::Byte) {
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    Ok(freq)
}
