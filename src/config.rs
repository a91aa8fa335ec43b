//! Configuration for the corpus processing pipeline.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::str::FromStr;

/// A language with its own tokenization rule set.
///
/// The variants are the languages the corpus carries dedicated word-boundary
/// rules for. Anything else resolves to [`Language::English`] through
/// [`LanguageTable::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Czech.
    Czech,
    /// Danish.
    Danish,
    /// Dutch.
    Dutch,
    /// English. The default for unresolved or unsupported codes.
    #[default]
    English,
    /// Estonian.
    Estonian,
    /// Finnish.
    Finnish,
    /// French.
    French,
    /// German.
    German,
    /// Greek.
    Greek,
    /// Italian.
    Italian,
    /// Norwegian.
    Norwegian,
    /// Polish.
    Polish,
    /// Portuguese.
    Portuguese,
    /// Slovene.
    Slovene,
    /// Spanish.
    Spanish,
    /// Swedish.
    Swedish,
    /// Turkish.
    Turkish,
}

impl Language {
    /// Returns the lowercase language name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Czech => "czech",
            Language::Danish => "danish",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::Estonian => "estonian",
            Language::Finnish => "finnish",
            Language::French => "french",
            Language::German => "german",
            Language::Greek => "greek",
            Language::Italian => "italian",
            Language::Norwegian => "norwegian",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Slovene => "slovene",
            Language::Spanish => "spanish",
            Language::Swedish => "swedish",
            Language::Turkish => "turkish",
        }
    }

    /// All supported languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::Czech,
            Language::Danish,
            Language::Dutch,
            Language::English,
            Language::Estonian,
            Language::Finnish,
            Language::French,
            Language::German,
            Language::Greek,
            Language::Italian,
            Language::Norwegian,
            Language::Polish,
            Language::Portuguese,
            Language::Slovene,
            Language::Spanish,
            Language::Swedish,
            Language::Turkish,
        ]
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        Language::all()
            .iter()
            .find(|l| l.as_str() == name)
            .copied()
            .ok_or_else(|| format!("unsupported language name: {s}"))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from ISO 639-1 codes to tokenizer languages.
///
/// Owns the code table and the explicit fallback rule: a code with no entry
/// resolves to the default language rather than failing.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    codes: HashMap<&'static str, Language>,
    default: Language,
}

impl LanguageTable {
    /// Creates the table with the given fallback language.
    pub fn with_default(default: Language) -> Self {
        let codes = HashMap::from([
            ("cs", Language::Czech),
            ("da", Language::Danish),
            ("nl", Language::Dutch),
            ("en", Language::English),
            ("et", Language::Estonian),
            ("fi", Language::Finnish),
            ("fr", Language::French),
            ("de", Language::German),
            ("el", Language::Greek),
            ("it", Language::Italian),
            ("no", Language::Norwegian),
            ("pl", Language::Polish),
            ("pt", Language::Portuguese),
            ("sl", Language::Slovene),
            ("es", Language::Spanish),
            ("sv", Language::Swedish),
            ("tr", Language::Turkish),
        ]);
        Self { codes, default }
    }

    /// Resolves an ISO code to a language, falling back to the default for
    /// unknown or unsupported codes.
    pub fn resolve(&self, code: &str) -> Language {
        let code = code.trim().to_ascii_lowercase();
        self.codes.get(code.as_str()).copied().unwrap_or(self.default)
    }

    /// The fallback language for unknown codes.
    pub fn default_language(&self) -> Language {
        self.default
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::with_default(Language::English)
    }
}

/// Selects which numeric book IDs a batch run processes.
///
/// Supplied externally to the batch driver; a file outside the filter is
/// skipped, not failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IdFilter {
    /// Process every discovered book.
    All,
    /// Process IDs inside an inclusive range.
    Range {
        /// Lowest ID included.
        lo: u32,
        /// Highest ID included.
        hi: u32,
    },
    /// Process exactly these IDs.
    Set(HashSet<u32>),
}

impl IdFilter {
    /// Creates an inclusive range filter.
    pub fn range(lo: u32, hi: u32) -> Self {
        IdFilter::Range { lo, hi }
    }

    /// Creates a set filter from any ID collection.
    pub fn set<I: IntoIterator<Item = u32>>(ids: I) -> Self {
        IdFilter::Set(ids.into_iter().collect())
    }

    /// Returns true if the given numeric ID should be processed.
    pub fn matches(&self, id: u32) -> bool {
        match self {
            IdFilter::All => true,
            IdFilter::Range { lo, hi } => (*lo..=*hi).contains(&id),
            IdFilter::Set(ids) => ids.contains(&id),
        }
    }
}

impl Default for IdFilter {
    fn default() -> Self {
        IdFilter::All
    }
}

/// Configuration for one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory of raw book files (`PG{id}_raw.txt`).
    /// Default: `data/raw`.
    pub raw_dir: PathBuf,

    /// Output directory for cleaned text artifacts.
    /// Default: `data/text`.
    pub text_dir: PathBuf,

    /// Output directory for token artifacts.
    /// Default: `data/tokens`.
    pub tokens_dir: PathBuf,

    /// Output directory for count artifacts.
    /// Default: `data/counts`.
    pub counts_dir: PathBuf,

    /// Append-only failure log. `None` disables the file log.
    /// Default: `None`.
    pub log_file: Option<PathBuf>,

    /// Which numeric book IDs to process.
    /// Default: all.
    pub filter: IdFilter,

    /// Show a progress bar while the batch runs.
    /// Default: true.
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            text_dir: PathBuf::from("data/text"),
            tokens_dir: PathBuf::from("data/tokens"),
            counts_dir: PathBuf::from("data/counts"),
            log_file: None,
            filter: IdFilter::All,
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_codes() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("en"), Language::English);
        assert_eq!(table.resolve("fr"), Language::French);
        assert_eq!(table.resolve("de"), Language::German);
    }

    #[test]
    fn test_resolve_unknown_code_falls_back() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("xx"), Language::English);
        assert_eq!(table.resolve(""), Language::English);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let table = LanguageTable::default();
        assert_eq!(table.resolve("EN"), Language::English);
        assert_eq!(table.resolve(" Fr "), Language::French);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("english".parse::<Language>(), Ok(Language::English));
        assert_eq!("German".parse::<Language>(), Ok(Language::German));
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_id_filter_range_is_inclusive() {
        let filter = IdFilter::range(10_000, 10_099);
        assert!(filter.matches(10_000));
        assert!(filter.matches(10_099));
        assert!(!filter.matches(9_999));
        assert!(!filter.matches(10_100));
    }

    #[test]
    fn test_id_filter_set_and_all() {
        let filter = IdFilter::set([3, 7]);
        assert!(filter.matches(3));
        assert!(!filter.matches(4));
        assert!(IdFilter::All.matches(4));
    }
}
