//! Batch driver: discovery, language resolution, failure isolation.
//!
//! Walks a directory of raw book files, resolves each book's language from
//! metadata, and hands every file to the per-book pipeline. A file moves
//! through `Discovered → IDResolved → LanguageResolved → Processed`; whatever
//! goes wrong with one file is tallied and logged, never allowed to abort
//! the rest of the batch.

use crate::config::{BatchConfig, LanguageTable};
use crate::error::{CorpusError, FailureReason, Result};
use crate::metadata::MetadataTable;
use crate::pipeline::{process_book, BookId, ProcessingOutcome};
use crate::text::Tokenizer;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    /// Files handed to the pipeline (after ID filtering).
    pub processed: usize,
    /// Books with all three artifacts written.
    pub succeeded: usize,
    /// Failure tally by reason.
    pub failures: BTreeMap<FailureReason, usize>,
    /// Files skipped by the ID filter.
    pub skipped: usize,
}

impl BatchSummary {
    /// Total number of failed files.
    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    fn record(&mut self, outcome: &ProcessingOutcome) {
        self.processed += 1;
        match outcome {
            ProcessingOutcome::Success { .. } => self.succeeded += 1,
            ProcessingOutcome::Failure { reason, .. } => {
                *self.failures.entry(*reason).or_insert(0) += 1;
            }
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processed {} books: {} succeeded, {} failed, {} skipped by filter",
            self.processed, self.succeeded, self.failed(), self.skipped)?;
        for (reason, count) in &self.failures {
            writeln!(f, "  {reason}: {count}")?;
        }
        Ok(())
    }
}

/// Append-only per-book failure log.
///
/// One tab-separated line per failure: book ID, reason tag, detail. Meant
/// for operators; the machine-checkable tally lives in [`BatchSummary`].
struct FailureLog {
    file: Option<File>,
}

impl FailureLog {
    fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?,
            ),
            None => None,
        };
        Ok(Self { file })
    }

    fn record(&mut self, book_id: &str, reason: FailureReason, detail: &str) {
        warn!("{book_id}: {reason}: {detail}");
        if let Some(file) = &mut self.file {
            if let Err(err) = writeln!(file, "{book_id}\t{reason}\t{detail}") {
                warn!("cannot append to failure log: {err}");
            }
        }
    }
}

/// Sequential driver over a directory of raw book files.
pub struct BatchDriver {
    config: BatchConfig,
    languages: LanguageTable,
    tokenizer: Tokenizer,
}

impl BatchDriver {
    /// Creates a driver with the given configuration and language table.
    pub fn new(config: BatchConfig, languages: LanguageTable) -> Self {
        Self {
            config,
            languages,
            tokenizer: Tokenizer::new(),
        }
    }

    /// Runs the batch over every raw file in the configured directory.
    ///
    /// Only batch-level setup can fail here (unreadable raw directory,
    /// unopenable failure log); per-file problems become tallied outcomes.
    pub fn run(&self, metadata: &MetadataTable) -> Result<BatchSummary> {
        let files = discover_raw_files(&self.config.raw_dir)?;
        info!("discovered {} raw files in {}", files.len(), self.config.raw_dir.display());

        let mut log = FailureLog::open(self.config.log_file.as_deref())?;
        let mut summary = BatchSummary::default();

        let bar = if self.config.show_progress {
            let bar = ProgressBar::new(files.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░  "),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        for path in &files {
            match self.process_one(path, metadata) {
                Some(outcome) => {
                    if let ProcessingOutcome::Failure { book_id, reason, detail } = &outcome {
                        log.record(book_id, *reason, detail);
                    }
                    summary.record(&outcome);
                }
                None => summary.skipped += 1,
            }
            bar.inc(1);
            bar.set_message(format!("{} processed", summary.succeeded));
        }
        bar.finish_and_clear();

        info!("batch finished: {} succeeded, {} failed, {} skipped",
            summary.succeeded, summary.failed(), summary.skipped);
        Ok(summary)
    }

    /// Runs one file through the per-file state machine. `None` means the
    /// file was filtered out, not failed.
    fn process_one(&self, path: &Path, metadata: &MetadataTable) -> Option<ProcessingOutcome> {
        // Discovered → IDResolved
        let book_id = match BookId::from_raw_path(path) {
            Ok(id) => id,
            Err(err) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                return Some(ProcessingOutcome::Failure {
                    book_id: name,
                    reason: (&err).into(),
                    detail: err.to_string(),
                });
            }
        };

        if !self.config.filter.matches(book_id.number()) {
            return None;
        }

        // IDResolved → LanguageResolved
        let codes = match metadata.language_codes(book_id.number()) {
            Ok(codes) => codes,
            Err(err) => {
                return Some(ProcessingOutcome::Failure {
                    book_id: book_id.as_str().to_string(),
                    reason: (&err).into(),
                    detail: err.to_string(),
                })
            }
        };
        let language = self.languages.resolve(&codes[0]);

        // LanguageResolved → Processed
        Some(process_book(
            path,
            &self.config.text_dir,
            &self.config.tokens_dir,
            &self.config.counts_dir,
            language,
            &self.tokenizer,
        ))
    }
}

/// Lists raw book files (`PG*_raw.txt`) in a directory, sorted by name for
/// deterministic batch order.
fn discover_raw_files(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(raw_dir).map_err(|source| CorpusError::Read {
        path: raw_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with("PG") && name.ends_with("_raw.txt") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdFilter;
    use std::fs;
    use tempfile::tempdir;

    fn write_raw(dir: &Path, number: u32, body: &str) {
        let content = format!(
            "*** START OF THE PROJECT GUTENBERG EBOOK ***\n{body}\n*** END OF THE PROJECT GUTENBERG EBOOK ***\n"
        );
        fs::write(dir.join(format!("PG{number}_raw.txt")), content).unwrap();
    }

    fn test_setup(raw_dir: &Path, out_dir: &Path) -> BatchConfig {
        BatchConfig {
            raw_dir: raw_dir.to_path_buf(),
            text_dir: out_dir.to_path_buf(),
            tokens_dir: out_dir.to_path_buf(),
            counts_dir: out_dir.to_path_buf(),
            log_file: None,
            filter: IdFilter::All,
            show_progress: false,
        }
    }

    #[test]
    fn test_discover_raw_files_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        write_raw(dir.path(), 12, "b");
        write_raw(dir.path(), 11, "a");
        fs::write(dir.path().join("README.md"), "not a book").unwrap();

        let files = discover_raw_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["PG11_raw.txt", "PG12_raw.txt"]);
    }

    #[test]
    fn test_batch_processes_all_books() {
        let raw = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_raw(raw.path(), 1, "One fish.");
        write_raw(raw.path(), 2, "Two fish.");

        let mut metadata = MetadataTable::default();
        metadata.insert(1, "['en']");
        metadata.insert(2, "['en']");

        let driver = BatchDriver::new(
            test_setup(raw.path(), out.path()),
            LanguageTable::default(),
        );
        let summary = driver.run(&metadata).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed(), 0);
        assert!(out.path().join("PG1_counts.txt").exists());
        assert!(out.path().join("PG2_counts.txt").exists());
    }

    #[test]
    fn test_missing_metadata_is_isolated_failure() {
        let raw = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_raw(raw.path(), 1, "Has metadata.");
        write_raw(raw.path(), 2, "Has none.");

        let mut metadata = MetadataTable::default();
        metadata.insert(1, "['en']");

        let driver = BatchDriver::new(
            test_setup(raw.path(), out.path()),
            LanguageTable::default(),
        );
        let summary = driver.run(&metadata).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failures[&FailureReason::MetadataMissing], 1);
    }

    #[test]
    fn test_malformed_metadata_is_isolated_failure() {
        let raw = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_raw(raw.path(), 1, "Broken language list.");

        let mut metadata = MetadataTable::default();
        metadata.insert(1, "['en'");

        let driver = BatchDriver::new(
            test_setup(raw.path(), out.path()),
            LanguageTable::default(),
        );
        let summary = driver.run(&metadata).unwrap();

        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failures[&FailureReason::MalformedMetadata], 1);
    }

    #[test]
    fn test_id_filter_skips_without_failing() {
        let raw = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_raw(raw.path(), 5, "In range.");
        write_raw(raw.path(), 50, "Out of range.");

        let mut metadata = MetadataTable::default();
        metadata.insert(5, "['en']");
        metadata.insert(50, "['en']");

        let mut config = test_setup(raw.path(), out.path());
        config.filter = IdFilter::range(1, 10);
        let driver = BatchDriver::new(config, LanguageTable::default());
        let summary = driver.run(&metadata).unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_failure_log_is_appended() {
        let raw = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_raw(raw.path(), 1, "Fine.");
        fs::write(raw.path().join("PG2_raw.txt"), [0xff, 0xfe]).unwrap();

        let mut metadata = MetadataTable::default();
        metadata.insert(1, "['en']");
        metadata.insert(2, "['en']");

        let log_path = out.path().join("failures.log");
        let mut config = test_setup(raw.path(), out.path());
        config.log_file = Some(log_path.clone());
        let driver = BatchDriver::new(config, LanguageTable::default());
        let summary = driver.run(&metadata).unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failures[&FailureReason::Decode], 1);

        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("PG2\tDecodeError"));
    }

    #[test]
    fn test_unknown_language_code_falls_back_to_english() {
        let raw = tempdir().unwrap();
        let out_en = tempdir().unwrap();
        let out_xx = tempdir().unwrap();
        write_raw(raw.path(), 1, "The same words, either way.");

        let run = |out: &Path, field: &str| {
            let mut metadata = MetadataTable::default();
            metadata.insert(1, field);
            let driver = BatchDriver::new(
                test_setup(raw.path(), out),
                LanguageTable::default(),
            );
            driver.run(&metadata).unwrap()
        };
        assert_eq!(run(out_en.path(), "['en']").succeeded, 1);
        assert_eq!(run(out_xx.path(), "['xx']").succeeded, 1);

        let en = fs::read(out_en.path().join("PG1_tokens.txt")).unwrap();
        let xx = fs::read(out_xx.path().join("PG1_tokens.txt")).unwrap();
        assert_eq!(en, xx);
    }
}
