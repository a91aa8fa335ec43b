//! Book metadata lookup: numeric ID to language codes.
//!
//! The corpus metadata CSV is produced by an external harvester; this module
//! only consumes the two columns the pipeline needs (`id`, `language`) and
//! leaves the rest of the schema alone. The language field arrives as a
//! Python-style list literal (`['en']`, `['fr', 'en']`).

use crate::error::{CorpusError, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MetadataRecord {
    id: String,
    language: Option<String>,
}

/// Lookup table from numeric book ID to the raw metadata language field.
///
/// The field is kept unparsed so a malformed entry fails the one book that
/// needs it instead of the whole table load.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    languages: HashMap<u32, String>,
}

impl MetadataTable {
    /// Loads the table from a metadata CSV with `id` and `language` columns.
    ///
    /// Rows whose ID does not carry a `PG{number}` form are skipped; rows
    /// without a language value are stored empty and surface as
    /// [`CorpusError::MalformedMetadata`] on lookup.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|source| CorpusError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        let mut reader = csv::Reader::from_reader(file);
        let mut languages = HashMap::new();
        for record in reader.deserialize() {
            let record: MetadataRecord = record
                .map_err(|e| CorpusError::Config(format!("cannot parse metadata CSV: {e}")))?;
            match parse_numeric_id(&record.id) {
                Some(number) => {
                    languages.insert(number, record.language.unwrap_or_default());
                }
                None => debug!("skipping metadata row with unrecognized id {:?}", record.id),
            }
        }

        Ok(Self { languages })
    }

    /// Inserts an entry with a raw language field.
    pub fn insert(&mut self, number: u32, language_field: &str) {
        self.languages.insert(number, language_field.to_string());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns true when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Returns the language codes recorded for a book.
    ///
    /// Fails with [`CorpusError::MetadataMissing`] when the book has no
    /// entry and [`CorpusError::MalformedMetadata`] when the language field
    /// cannot be parsed or lists no codes.
    pub fn language_codes(&self, number: u32) -> Result<Vec<String>> {
        let field = self
            .languages
            .get(&number)
            .ok_or_else(|| CorpusError::MetadataMissing(format!("PG{number}")))?;

        let codes = parse_language_field(field).ok_or_else(|| CorpusError::MalformedMetadata {
            id: format!("PG{number}"),
            detail: format!("language field {field:?}"),
        })?;
        Ok(codes)
    }
}

fn parse_numeric_id(id: &str) -> Option<u32> {
    id.strip_prefix("PG")?.parse().ok()
}

/// Parses a metadata language field into its codes.
///
/// Accepts the Python list literal form (`['en']`, `["fr", "en"]`) and, for
/// hand-written tables, a bare code (`en`). Returns `None` for anything else,
/// including an empty list.
fn parse_language_field(field: &str) -> Option<Vec<String>> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }

    let inner = match field.strip_prefix('[') {
        Some(rest) => rest.strip_suffix(']')?,
        None => {
            // Bare code form.
            return is_language_code(field).then(|| vec![field.to_string()]);
        }
    };

    let mut codes = Vec::new();
    for part in inner.split(',') {
        let code = part
            .trim()
            .trim_matches(|c| c == '\'' || c == '"')
            .trim();
        if !is_language_code(code) {
            return None;
        }
        codes.push(code.to_string());
    }
    if codes.is_empty() {
        return None;
    }
    Some(codes)
}

fn is_language_code(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_language_field_list() {
        assert_eq!(parse_language_field("['en']"), Some(vec!["en".to_string()]));
        assert_eq!(
            parse_language_field("['fr', 'en']"),
            Some(vec!["fr".to_string(), "en".to_string()])
        );
        assert_eq!(
            parse_language_field("[\"de\"]"),
            Some(vec!["de".to_string()])
        );
    }

    #[test]
    fn test_parse_language_field_bare_code() {
        assert_eq!(parse_language_field("en"), Some(vec!["en".to_string()]));
    }

    #[test]
    fn test_parse_language_field_rejects_garbage() {
        assert_eq!(parse_language_field(""), None);
        assert_eq!(parse_language_field("[]"), None);
        assert_eq!(parse_language_field("['en'"), None);
        assert_eq!(parse_language_field("[123]"), None);
    }

    #[test]
    fn test_language_codes_missing_entry() {
        let table = MetadataTable::default();
        assert!(matches!(
            table.language_codes(42),
            Err(CorpusError::MetadataMissing(_))
        ));
    }

    #[test]
    fn test_language_codes_malformed_entry() {
        let mut table = MetadataTable::default();
        table.insert(42, "not a list at all!");
        assert!(matches!(
            table.language_codes(42),
            Err(CorpusError::MalformedMetadata { .. })
        ));
    }

    #[test]
    fn test_from_csv_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "id,title,language").unwrap();
        writeln!(file, "PG10073,Some Title,\"['en']\"").unwrap();
        writeln!(file, "PG10074,Un Titre,\"['fr']\"").unwrap();
        writeln!(file, "not-a-book,Junk,\"['en']\"").unwrap();
        drop(file);

        let table = MetadataTable::from_csv_path(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.language_codes(10073).unwrap(), vec!["en"]);
        assert_eq!(table.language_codes(10074).unwrap(), vec!["fr"]);
    }
}
