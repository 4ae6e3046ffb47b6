// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   decode   — greedy CTC decoding of recorded class probabilities
//   windows  — print the model input windows for a question
//   answer   — pick the best answer span from recorded logits
//
// `windows` and `answer` share QaArgs so both build the exact
// same windows from the same flags.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::answer_use_case::AnswerConfig;
use crate::infra::config_store::ConfigStore;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode per-timestep class probabilities into text
    Decode(DecodeArgs),

    /// Split documents into model input windows for a question (JSON)
    Windows(WindowsArgs),

    /// Select the best answer span from recorded start/end logits
    Answer(AnswerArgs),
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// JSON model output: {"shape": [T, V] or [B, T, V], "data": [...]}
    #[arg(long)]
    pub probs: PathBuf,

    /// Character dictionary, one symbol per line
    #[arg(long)]
    pub alphabet: PathBuf,

    /// Insert the blank symbol at index 0 before the dictionary entries
    #[arg(long)]
    pub prepend_blank: bool,

    /// Symbol used for the prepended blank
    #[arg(long, default_value = "~")]
    pub blank_symbol: String,

    /// Class index of the blank
    #[arg(long, default_value_t = 0)]
    pub blank_index: usize,
}

impl DecodeArgs {
    pub fn prepended_blank(&self) -> Option<&str> {
        self.prepend_blank.then_some(self.blank_symbol.as_str())
    }
}

/// Everything needed to rebuild a window plan.
#[derive(Args, Debug)]
pub struct QaArgs {
    /// The natural language question
    #[arg(long)]
    pub question: String,

    /// A .txt/.docx file or a directory of them
    #[arg(long, default_value = "docs")]
    pub docs: PathBuf,

    /// tokenizer.json; a word-level one is built here if missing
    #[arg(long, default_value = "tokenizer.json")]
    pub tokenizer: PathBuf,

    /// Vocabulary size when a tokenizer has to be built
    #[arg(long, default_value_t = 30522)]
    pub vocab_size: usize,

    /// AnswerConfig JSON; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Model input length in tokens
    #[arg(long)]
    pub max_seq_len: Option<usize>,

    /// Fraction of each window's context shared with the next, in [0, 1)
    #[arg(long)]
    pub window_overlap: Option<f32>,

    /// Largest allowed end - start of an answer, in tokens
    #[arg(long)]
    pub max_span_length: Option<usize>,
}

impl QaArgs {
    /// Defaults, then the config file, then explicit flags.
    pub fn resolve_config(&self) -> Result<AnswerConfig> {
        let mut cfg = match &self.config {
            Some(path) => ConfigStore::new(path).load()?,
            None       => AnswerConfig::default(),
        };
        if let Some(v) = self.max_seq_len {
            cfg.max_seq_len = v;
        }
        if let Some(v) = self.window_overlap {
            cfg.window_overlap = v;
        }
        if let Some(v) = self.max_span_length {
            cfg.max_span_length = v;
        }
        cfg.validate()
    }
}

#[derive(Args, Debug)]
pub struct WindowsArgs {
    #[command(flatten)]
    pub qa: QaArgs,

    /// Also write the effective AnswerConfig here
    #[arg(long)]
    pub save_config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnswerArgs {
    #[command(flatten)]
    pub qa: QaArgs,

    /// JSON array of {"start_logits", "end_logits"}, one per window ordinal
    #[arg(long)]
    pub logits: PathBuf,
}
