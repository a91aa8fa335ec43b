//! Error types for the corpus processing pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for corpus processing operations.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A raw book file is missing or unreadable.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A raw book file is not valid UTF-8.
    #[error("Cannot decode {path} as UTF-8")]
    Decode {
        /// Path of the file that could not be decoded.
        path: PathBuf,
    },

    /// Boilerplate removal produced no usable body text.
    #[error("No usable body text after boilerplate removal")]
    BoilerplateNotFound,

    /// No metadata entry exists for a book.
    #[error("No metadata entry for {0}")]
    MetadataMissing(String),

    /// The metadata language field could not be parsed.
    #[error("Malformed metadata for {id}: {detail}")]
    MalformedMetadata {
        /// The book the field belongs to.
        id: String,
        /// What was wrong with the field.
        detail: String,
    },

    /// A file name carries no recognizable book ID.
    #[error("No recognizable book ID in file name: {0}")]
    InvalidId(String),

    /// Invalid driver configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for corpus processing operations.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Machine-checkable tag for a per-book failure.
///
/// Every [`CorpusError`] maps onto exactly one tag; anything that escapes the
/// classification (including I/O errors surfacing mid-write) is tagged
/// [`FailureReason::Other`] so the batch tally stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FailureReason {
    /// File missing or unreadable.
    Read,
    /// File not decodable as UTF-8.
    Decode,
    /// No usable body text after boilerplate removal.
    BoilerplateNotFound,
    /// No metadata entry for this book.
    MetadataMissing,
    /// Metadata language field not parseable.
    MalformedMetadata,
    /// File name carries no recognizable book ID.
    InvalidId,
    /// Any unclassified failure.
    Other,
}

impl FailureReason {
    /// Returns the tag as a stable string, as written to the failure log.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Read => "ReadError",
            FailureReason::Decode => "DecodeError",
            FailureReason::BoilerplateNotFound => "BoilerplateNotFound",
            FailureReason::MetadataMissing => "MetadataMissing",
            FailureReason::MalformedMetadata => "MalformedMetadata",
            FailureReason::InvalidId => "InvalidId",
            FailureReason::Other => "Other",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&CorpusError> for FailureReason {
    fn from(err: &CorpusError) -> Self {
        match err {
            CorpusError::Read { .. } => FailureReason::Read,
            CorpusError::Decode { .. } => FailureReason::Decode,
            CorpusError::BoilerplateNotFound => FailureReason::BoilerplateNotFound,
            CorpusError::MetadataMissing(_) => FailureReason::MetadataMissing,
            CorpusError::MalformedMetadata { .. } => FailureReason::MalformedMetadata,
            CorpusError::InvalidId(_) => FailureReason::InvalidId,
            CorpusError::Config(_) | CorpusError::Io(_) => FailureReason::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_mapping() {
        let err = CorpusError::Decode {
            path: PathBuf::from("PG1_raw.txt"),
        };
        assert_eq!(FailureReason::from(&err), FailureReason::Decode);

        let err = CorpusError::MetadataMissing("PG1".to_string());
        assert_eq!(FailureReason::from(&err), FailureReason::MetadataMissing);

        let err = CorpusError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk gone",
        ));
        assert_eq!(FailureReason::from(&err), FailureReason::Other);
    }

    #[test]
    fn test_failure_reason_tags_are_stable() {
        assert_eq!(FailureReason::Read.as_str(), "ReadError");
        assert_eq!(FailureReason::Decode.as_str(), "DecodeError");
        assert_eq!(FailureReason::Other.to_string(), "Other");
    }
}
