//! Language-aware tokenization of cleaned book texts.

use crate::config::Language;
use unicode_segmentation::UnicodeSegmentation;

/// Clitic prefixes that elide before a vowel in Romance orthographies
/// ("l'homme", "qu'il").
const ELISION_PREFIXES: &[&str] = &[
    "jusqu", "lorsqu", "puisqu", "quoiqu", "qu", "l", "d", "j", "m", "n", "s", "t", "c",
];

/// Per-language tokenization rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRules {
    /// Split a leading elided clitic (`l'`, `d'`, `qu'`, ...) into its own
    /// token.
    pub split_elisions: bool,
}

impl TokenRules {
    /// Returns the rule set for a language.
    ///
    /// Languages without dedicated rules share the english defaults; unknown
    /// language *codes* never reach this point, they resolve to english in
    /// [`crate::config::LanguageTable`].
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::French | Language::Italian => Self {
                split_elisions: true,
            },
            _ => Self {
                split_elisions: false,
            },
        }
    }
}

/// Splits cleaned text into a sequence of word tokens.
///
/// Segmentation follows UAX-29 word boundaries: contractions stay intact,
/// while punctuation and number runs become tokens of their own. The only
/// filtering applied is dropping whitespace segments; case and accents are
/// preserved exactly as written. Deterministic: the same (text, language)
/// pair always yields the same sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    pub fn new() -> Self {
        Self
    }

    /// Tokenizes text under the given language's rules.
    pub fn tokenize(&self, text: &str, language: Language) -> Vec<String> {
        let rules = TokenRules::for_language(language);
        let mut tokens = Vec::new();

        for segment in text.split_word_bounds() {
            if segment.chars().all(char::is_whitespace) {
                continue;
            }
            if rules.split_elisions {
                if let Some((clitic, rest)) = split_elision(segment) {
                    tokens.push(clitic.to_string());
                    tokens.push(rest.to_string());
                    continue;
                }
            }
            tokens.push(segment.to_string());
        }

        tokens
    }
}

/// Splits `l'homme` into (`l'`, `homme`). Returns `None` when the segment
/// carries no elided clitic or nothing follows the apostrophe.
fn split_elision(segment: &str) -> Option<(&str, &str)> {
    let apostrophe = segment.find(['\'', '\u{2019}'])?;
    let prefix = &segment[..apostrophe];
    if prefix.is_empty() || !is_elision_prefix(prefix) {
        return None;
    }
    let split = apostrophe + segment[apostrophe..].chars().next().map_or(0, char::len_utf8);
    let rest = &segment[split..];
    if rest.is_empty() {
        return None;
    }
    Some((&segment[..split], rest))
}

fn is_elision_prefix(prefix: &str) -> bool {
    ELISION_PREFIXES
        .iter()
        .any(|p| prefix.eq_ignore_ascii_case(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str, language: Language) -> Vec<String> {
        Tokenizer::new().tokenize(text, language)
    }

    #[test]
    fn test_tokenize_keeps_punctuation() {
        let tokens = tokenize("Hello world.\nHello again.", Language::English);
        assert_eq!(tokens, vec!["Hello", "world", ".", "Hello", "again", "."]);
    }

    #[test]
    fn test_tokenize_preserves_case_and_accents() {
        let tokens = tokenize("Der Bär läuft", Language::German);
        assert_eq!(tokens, vec!["Der", "Bär", "läuft"]);
    }

    #[test]
    fn test_contractions_stay_intact_in_english() {
        let tokens = tokenize("don't stop", Language::English);
        assert_eq!(tokens, vec!["don't", "stop"]);
    }

    #[test]
    fn test_numbers_are_tokens() {
        let tokens = tokenize("In 1492, Columbus", Language::English);
        assert_eq!(tokens, vec!["In", "1492", ",", "Columbus"]);
    }

    #[test]
    fn test_french_elision_splitting() {
        let tokens = tokenize("L'homme qu'il admire", Language::French);
        assert_eq!(tokens, vec!["L'", "homme", "qu'", "il", "admire"]);
    }

    #[test]
    fn test_elision_kept_whole_in_english() {
        let tokens = tokenize("L'homme", Language::English);
        assert_eq!(tokens, vec!["L'homme"]);
    }

    #[test]
    fn test_curly_apostrophe_elision() {
        let tokens = tokenize("d\u{2019}argent", Language::French);
        assert_eq!(tokens, vec!["d\u{2019}", "argent"]);
    }

    #[test]
    fn test_non_elision_apostrophe_stays_whole_in_french() {
        // "aujourd'hui" carries an apostrophe but no clitic prefix.
        let tokens = tokenize("aujourd'hui", Language::French);
        assert_eq!(tokens, vec!["aujourd'hui"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Same text, same tokens. Même texte.";
        let first = tokenize(text, Language::French);
        let second = tokenize(text, Language::French);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("", Language::English).is_empty());
        assert!(tokenize("  \n\t ", Language::English).is_empty());
    }
}
