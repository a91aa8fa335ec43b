//! Per-book processing pipeline.
//!
//! One call to [`process_book`] turns a raw book file into its three derived
//! artifacts: cleaned text, one token per line, and a tab-separated word
//! count table. Errors never propagate past this boundary; they are
//! converted into a tagged [`ProcessingOutcome`] so a batch caller can keep
//! going.

use crate::config::Language;
use crate::counts::FrequencyTable;
use crate::error::{CorpusError, FailureReason, Result};
use crate::text::{strip_boilerplate, Tokenizer};
use log::debug;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Stable textual identifier of one book (`PG10073`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookId {
    text: String,
    number: u32,
}

impl BookId {
    /// Extracts the ID from a raw file path of the form `PG{number}_raw.txt`.
    pub fn from_raw_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CorpusError::InvalidId(path.display().to_string()))?;

        let stem = name.split('_').next().unwrap_or(name);
        let number = stem
            .strip_prefix("PG")
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| CorpusError::InvalidId(name.to_string()))?;

        Ok(Self {
            text: stem.to_string(),
            number,
        })
    }

    /// The textual form, e.g. `PG10073`.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The numeric part, e.g. `10073`.
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Result of processing one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// All three artifacts were written.
    Success {
        /// The book that was processed.
        book_id: String,
        /// Length of the token sequence.
        tokens: usize,
        /// Number of distinct tokens.
        distinct: usize,
    },
    /// The book was not processed; no artifacts were committed.
    Failure {
        /// The book (or, for ID failures, the file name) that failed.
        book_id: String,
        /// Machine-checkable failure tag.
        reason: FailureReason,
        /// Human-readable detail for the failure log.
        detail: String,
    },
}

impl ProcessingOutcome {
    /// Returns true for a success outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Success { .. })
    }

    /// The book ID (or file name) the outcome belongs to.
    pub fn book_id(&self) -> &str {
        match self {
            ProcessingOutcome::Success { book_id, .. } => book_id,
            ProcessingOutcome::Failure { book_id, .. } => book_id,
        }
    }

    fn failure(book_id: &str, err: &CorpusError) -> Self {
        ProcessingOutcome::Failure {
            book_id: book_id.to_string(),
            reason: err.into(),
            detail: err.to_string(),
        }
    }
}

/// Processes one raw book file into its three artifacts.
///
/// Reads and decodes the file, strips boilerplate, tokenizes under
/// `language`, counts, and writes `PG{id}_text.txt`, `PG{id}_tokens.txt` and
/// `PG{id}_counts.txt` into the three target directories. Artifacts are
/// staged to temporary siblings and only renamed into place once every stage
/// has succeeded, so a failure part-way never leaves a mixed-version set.
pub fn process_book(
    raw_path: &Path,
    text_dir: &Path,
    tokens_dir: &Path,
    counts_dir: &Path,
    language: Language,
    tokenizer: &Tokenizer,
) -> ProcessingOutcome {
    let book_id = match BookId::from_raw_path(raw_path) {
        Ok(id) => id,
        Err(err) => {
            let name = raw_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| raw_path.display().to_string());
            return ProcessingOutcome::failure(&name, &err);
        }
    };

    match run_stages(raw_path, text_dir, tokens_dir, counts_dir, language, tokenizer, &book_id) {
        Ok((tokens, distinct)) => {
            debug!("{book_id}: {tokens} tokens, {distinct} distinct");
            ProcessingOutcome::Success {
                book_id: book_id.as_str().to_string(),
                tokens,
                distinct,
            }
        }
        Err(err) => ProcessingOutcome::failure(book_id.as_str(), &err),
    }
}

fn run_stages(
    raw_path: &Path,
    text_dir: &Path,
    tokens_dir: &Path,
    counts_dir: &Path,
    language: Language,
    tokenizer: &Tokenizer,
    book_id: &BookId,
) -> Result<(usize, usize)> {
    let bytes = fs::read(raw_path).map_err(|source| CorpusError::Read {
        path: raw_path.to_path_buf(),
        source,
    })?;
    let raw = String::from_utf8(bytes).map_err(|_| CorpusError::Decode {
        path: raw_path.to_path_buf(),
    })?;

    let stripped = strip_boilerplate(&raw)?;
    let tokens = tokenizer.tokenize(stripped.body, language);
    let table = FrequencyTable::from_tokens(&tokens);

    let mut tokens_artifact = tokens.join("\n");
    if !tokens_artifact.is_empty() {
        tokens_artifact.push('\n');
    }

    write_artifacts(&[
        (
            text_dir.join(format!("{book_id}_text.txt")),
            format!("{}\n", stripped.body),
        ),
        (
            tokens_dir.join(format!("{book_id}_tokens.txt")),
            tokens_artifact,
        ),
        (
            counts_dir.join(format!("{book_id}_counts.txt")),
            table.to_tsv(),
        ),
    ])?;

    Ok((tokens.len(), table.len()))
}

/// Stages every artifact to a temporary sibling, then renames them all into
/// place. An error while staging removes whatever was staged so far and
/// commits nothing.
fn write_artifacts(artifacts: &[(PathBuf, String)]) -> Result<()> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(artifacts.len());

    for (target, content) in artifacts {
        let tmp = staging_path(target);
        if let Err(err) = fs::write(&tmp, content) {
            discard(&staged);
            return Err(err.into());
        }
        staged.push((tmp, target.as_path()));
    }

    for (tmp, target) in &staged {
        if let Err(err) = fs::rename(tmp, target) {
            discard(&staged);
            return Err(err.into());
        }
    }

    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}
