// ============================================================
// Layer 6 — Config Store
// ============================================================
// Persists the AnswerConfig a window plan was built with.
//
// Windows are cut on the `windows` run and scored by an external
// model; the later `answer` run has to rebuild exactly the same
// windows to line the recorded logits up. Saving the config next
// to the plan and loading it again guarantees that.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::answer_use_case::AnswerConfig;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, cfg: &AnswerConfig) -> Result<()> {
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;
        tracing::debug!("Saved answer config to '{}'", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<AnswerConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;
        let cfg: AnswerConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", self.path.display()))?;
        cfg.validate()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("answer.json"));
        let cfg = AnswerConfig { max_seq_len: 64, max_span_length: 8, window_overlap: 0.25 };
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.json");
        fs::write(&path, r#"{"max_span_length": 30}"#).unwrap();
        let cfg = ConfigStore::new(&path).load().unwrap();
        assert_eq!(cfg.max_span_length, 30);
        assert_eq!(cfg.max_seq_len, AnswerConfig::default().max_seq_len);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.json");
        fs::write(&path, r#"{"window_overlap": 1.0}"#).unwrap();
        assert!(ConfigStore::new(&path).load().is_err());
    }
}
