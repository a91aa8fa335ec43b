//! Word-frequency aggregation.

use std::collections::HashMap;
use std::fmt::Write;

/// Sorted word-frequency table for one book.
///
/// Entries are ordered by descending count, ties broken by ascending
/// lexicographic token order, so two runs over the same tokens always render
/// identical artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    /// Aggregates a token sequence into a sorted table.
    ///
    /// Tokens are matched exactly; case and accents are preserved as
    /// tokenized.
    pub fn from_tokens(tokens: &[String]) -> Self {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }

        let mut entries: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(token, count)| (token.to_string(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self { entries }
    }

    /// The sorted `(token, count)` entries.
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts. Equals the length of the token sequence the table
    /// was built from.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Renders the table as tab-separated `token\tcount` lines.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for (token, count) in &self.entries {
            let _ = writeln!(out, "{token}\t{count}");
        }
        out
    }
}
