//! pg-corpus CLI - Project Gutenberg corpus processing.
//!
//! Command-line interface for turning raw book files into cleaned text,
//! token, and word-count artifacts.

use clap::{Parser, Subcommand};
use log::error;
use pg_corpus::{
    process_book, BatchConfig, BatchDriver, CorpusError, IdFilter, Language, LanguageTable,
    MetadataTable, ProcessingOutcome, Result, Tokenizer,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pg-corpus")]
#[command(version)]
#[command(about = "Processes raw Project Gutenberg texts: i) removing boilerplate, ii) tokenizing, iii) counting words", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every raw book in a directory
    Process {
        /// Path to the raw-folder (PG*_raw.txt files)
        #[arg(short, long, default_value = "data/raw")]
        raw: PathBuf,

        /// Path to the cleaned-text output folder
        #[arg(long, default_value = "data/text")]
        output_text: PathBuf,

        /// Path to the tokens output folder
        #[arg(long, default_value = "data/tokens")]
        output_tokens: PathBuf,

        /// Path to the counts output folder
        #[arg(long, default_value = "data/counts")]
        output_counts: PathBuf,

        /// Path to the metadata CSV (id and language columns)
        #[arg(short, long, default_value = "metadata/metadata.csv")]
        metadata: PathBuf,

        /// Only process numeric IDs in this inclusive range (e.g. 10000..10099)
        #[arg(long)]
        id_range: Option<String>,

        /// Only process these numeric IDs (comma-separated)
        #[arg(long, conflicts_with = "id_range")]
        ids: Option<String>,

        /// Append per-book failures to this file
        #[arg(short, long, default_value = ".log")]
        log_file: PathBuf,

        /// Quiet mode: no progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Process a single raw book file with an explicit language
    Book {
        /// Raw book file (PG{id}_raw.txt)
        input: PathBuf,

        /// Tokenizer language (e.g. english, french, german)
        #[arg(short, long, default_value = "english")]
        language: String,

        /// Path to the cleaned-text output folder
        #[arg(long, default_value = "data/text")]
        output_text: PathBuf,

        /// Path to the tokens output folder
        #[arg(long, default_value = "data/tokens")]
        output_tokens: PathBuf,

        /// Path to the counts output folder
        #[arg(long, default_value = "data/counts")]
        output_counts: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let result = match cli.command {
        Commands::Process {
            raw,
            output_text,
            output_tokens,
            output_counts,
            metadata,
            id_range,
            ids,
            log_file,
            quiet,
        } => run_process(
            raw,
            output_text,
            output_tokens,
            output_counts,
            metadata,
            id_range,
            ids,
            log_file,
            quiet,
        ),

        Commands::Book {
            input,
            language,
            output_text,
            output_tokens,
            output_counts,
        } => run_book(input, language, output_text, output_tokens, output_counts),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_process(
    raw: PathBuf,
    output_text: PathBuf,
    output_tokens: PathBuf,
    output_counts: PathBuf,
    metadata: PathBuf,
    id_range: Option<String>,
    ids: Option<String>,
    log_file: PathBuf,
    quiet: bool,
) -> Result<()> {
    ensure_dir(&output_text)?;
    ensure_dir(&output_tokens)?;
    ensure_dir(&output_counts)?;

    let filter = parse_filter(id_range.as_deref(), ids.as_deref())?;
    let metadata = MetadataTable::from_csv_path(&metadata)?;

    let config = BatchConfig {
        raw_dir: raw,
        text_dir: output_text,
        tokens_dir: output_tokens,
        counts_dir: output_counts,
        log_file: Some(log_file),
        filter,
        show_progress: !quiet,
    };

    let driver = BatchDriver::new(config, LanguageTable::default());
    let summary = driver.run(&metadata)?;
    print!("{summary}");

    Ok(())
}

fn run_book(
    input: PathBuf,
    language: String,
    output_text: PathBuf,
    output_tokens: PathBuf,
    output_counts: PathBuf,
) -> Result<()> {
    ensure_dir(&output_text)?;
    ensure_dir(&output_tokens)?;
    ensure_dir(&output_counts)?;

    let language: Language = language
        .parse()
        .map_err(CorpusError::Config)?;

    let outcome = process_book(
        &input,
        &output_text,
        &output_tokens,
        &output_counts,
        language,
        &Tokenizer::new(),
    );

    match outcome {
        ProcessingOutcome::Success {
            book_id,
            tokens,
            distinct,
        } => {
            println!("{book_id}: {tokens} tokens, {distinct} distinct");
            Ok(())
        }
        ProcessingOutcome::Failure {
            book_id,
            reason,
            detail,
        } => Err(CorpusError::Config(format!("{book_id}: {reason}: {detail}"))),
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(CorpusError::Config(format!(
            "output directory '{}' does not exist",
            dir.display()
        )));
    }
    Ok(())
}

/// Parses the `--id-range LO..HI` / `--ids a,b,c` flags into an [`IdFilter`].
fn parse_filter(id_range: Option<&str>, ids: Option<&str>) -> Result<IdFilter> {
    if let Some(range) = id_range {
        let (lo, hi) = range
            .split_once("..")
            .ok_or_else(|| CorpusError::Config(format!("invalid ID range '{range}', expected LO..HI")))?;
        let lo = lo
            .trim()
            .parse()
            .map_err(|_| CorpusError::Config(format!("invalid range bound '{lo}'")))?;
        let hi = hi
            .trim()
            .parse()
            .map_err(|_| CorpusError::Config(format!("invalid range bound '{hi}'")))?;
        return Ok(IdFilter::range(lo, hi));
    }

    if let Some(ids) = ids {
        let mut set = Vec::new();
        for part in ids.split(',') {
            let id = part
                .trim()
                .parse()
                .map_err(|_| CorpusError::Config(format!("invalid book ID '{part}'")))?;
            set.push(id);
        }
        return Ok(IdFilter::set(set));
    }

    Ok(IdFilter::All)
}
