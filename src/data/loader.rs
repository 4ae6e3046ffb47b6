// ============================================================
// Layer 4 — Document Loader
// ============================================================
// Loads the documents a question is asked against. The path
// may be one file or a directory of files.
//
// Supported formats:
//   .txt   read as UTF-8
//   .docx  paragraph text via docx-rs, one line per paragraph
//
//   Document → Paragraph → Run → Text
//
// Directory entries are visited in file-name order. Window
// ordinals depend on that order, and recorded logits are keyed
// by ordinal, so it must be stable between runs.

use anyhow::{bail, Context, Result};
use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::document::Document;
use crate::domain::traits::DocumentSource;

pub struct DocumentLoader {
    path: PathBuf,
}

impl DocumentLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_dir(&self) -> Result<Vec<Document>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.path)
            .with_context(|| format!("Cannot read directory '{}'", self.path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_supported(p))
            .collect();
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match load_file(&path) {
                Ok(doc) => {
                    tracing::debug!("Loaded: {} ({} bytes)", doc.source, doc.text.len());
                    docs.push(doc);
                }
                Err(e) => tracing::warn!("Skipping '{}': {e:#}", path.display()),
            }
        }
        Ok(docs)
    }
}

impl DocumentSource for DocumentLoader {
    fn load_all(&self) -> Result<Vec<Document>> {
        if !self.path.exists() {
            tracing::warn!("'{}' does not exist, returning empty corpus", self.path.display());
            return Ok(Vec::new());
        }

        let docs = if self.path.is_dir() {
            self.load_dir()?
        } else {
            vec![load_file(&self.path)?]
        };

        tracing::info!("Loaded {} documents from '{}'", docs.len(), self.path.display());
        Ok(docs)
    }
}

fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("txt" | "docx"))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn load_file(path: &Path) -> Result<Document> {
    let text = match extension(path).as_deref() {
        Some("txt")  => fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?,
        Some("docx") => docx_text(path)?,
        _ => bail!("Unsupported document type: '{}'", path.display()),
    };
    Ok(Document::new(source_name(path), text))
}

/// Non-empty paragraphs of a .docx file joined with newlines.
fn docx_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    let docx = read_docx(&bytes)
        .map_err(|e| anyhow::anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Runs inside one paragraph belong to the same line, so they
/// are concatenated without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                if let RunChild::Text(t) = rc {
                    out.push_str(&t.text);
                }
            }
        }
    }
    out
}
