//! Text processing module for boilerplate removal and tokenization.

mod strip;
mod tokenizer;

pub use strip::{strip_boilerplate, Stripped, TEXT_END_MARKERS, TEXT_START_MARKERS};
pub use tokenizer::{TokenRules, Tokenizer};
