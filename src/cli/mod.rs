// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, wires the collaborators together
// and prints results. All decoding work is delegated to the
// application layer.

pub mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{AnswerArgs, Commands, DecodeArgs, QaArgs, WindowsArgs};
use tokenizers::Tokenizer;

use crate::application::{
    answer_use_case::{AnswerConfig, AnswerUseCase},
    decode_use_case::DecodeUseCase,
};
use crate::data::loader::DocumentLoader;
use crate::domain::{document::Document, traits::{DocumentSource, QuestionAnswerer}};
use crate::infra::{config_store::ConfigStore, tokenizer_store::TokenizerStore};
use crate::ml::scorer::RecordedScorer;

#[derive(Parser, Debug)]
#[command(
    name = "logit-decode",
    version,
    about = "Decode CTC label sequences and select answer spans from model outputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Decode(args)  => run_decode(args),
            Commands::Windows(args) => run_windows(args),
            Commands::Answer(args)  => run_answer(args),
        }
    }
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let use_case = DecodeUseCase::from_alphabet_file(
        &args.alphabet,
        args.prepended_blank(),
        args.blank_index,
    )?;

    for decoded in use_case.run_file(&args.probs)? {
        println!("{}\t{:.4}", decoded.text, decoded.confidence);
    }
    Ok(())
}

/// Config, documents and tokenizer shared by `windows` and `answer`.
fn prepare(qa: &QaArgs) -> Result<(AnswerConfig, Vec<Document>, Tokenizer)> {
    let config = qa.resolve_config()?;
    let docs   = DocumentLoader::new(&qa.docs).load_all()?;

    let mut texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
    texts.push(&qa.question);
    let tokenizer = TokenizerStore::new(&qa.tokenizer).load_or_build(&texts, qa.vocab_size)?;

    Ok((config, docs, tokenizer))
}

fn run_windows(args: WindowsArgs) -> Result<()> {
    let (config, docs, tokenizer) = prepare(&args.qa)?;

    if let Some(path) = &args.save_config {
        ConfigStore::new(path).save(&config)?;
    }

    // Planning never calls the scorer
    let use_case = AnswerUseCase::new(&config, tokenizer, RecordedScorer::new(Vec::new()))?;
    let plans = use_case.plan(&args.qa.question, &docs)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plans).context("Cannot serialise window plan")?
    );
    Ok(())
}

fn run_answer(args: AnswerArgs) -> Result<()> {
    let (config, docs, tokenizer) = prepare(&args.qa)?;
    let scorer = RecordedScorer::from_file(&args.logits)?;

    let use_case = AnswerUseCase::new(&config, tokenizer, scorer)?;
    match use_case.answer(&args.qa.question, &docs)? {
        Some(best) => {
            println!("\nAnswer: {}", best.text);
            println!("Score:  {:.4}", best.score);
            println!("Source: {} (bytes {}..{})", best.source, best.char_start, best.char_end);
        }
        None => println!("\nNo answer found."),
    }
    Ok(())
}
