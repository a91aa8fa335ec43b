//! Boilerplate removal for raw book texts.
//!
//! Project Gutenberg files wrap the book body in a preamble and a postamble
//! whose delimiter lines were rephrased many times over the archive's
//! history. This module locates the delimiters and returns the inner span.
//!
//! The matching policy is deliberately asymmetric: a *missing* marker never
//! fails a book (plenty of legitimate files start at line 1 or run to EOF),
//! but a marker that is present always wins. The start delimiter is the first
//! matching line from the top; the end delimiter is the matching line closest
//! to the end of the file, so an in-body phrase that happens to look like an
//! end marker does not truncate the book.

use crate::error::{CorpusError, Result};
use log::warn;

/// Start-of-text delimiter phrasings, newest conventions first.
///
/// A line marks the start of the body when its leading-whitespace-trimmed
/// form begins with one of these. The `SMALL PRINT` entries close the legal
/// preamble of pre-2000 etexts.
pub const TEXT_START_MARKERS: &[&str] = &[
    "*** START OF THE PROJECT",
    "*** START OF THIS PROJECT",
    "***START OF THE PROJECT",
    "***START OF THIS PROJECT",
    "*** START OF THE COPYRIGHTED",
    "*END*THE SMALL PRINT",
    "*END THE SMALL PRINT",
];

/// End-of-text delimiter phrasings.
///
/// Same prefix matching as [`TEXT_START_MARKERS`]. The lowercase `End of`
/// forms appear in older etexts ("End of Project Gutenberg's ..."); the
/// `Ende dieses` forms in early German ones.
pub const TEXT_END_MARKERS: &[&str] = &[
    "*** END OF THE PROJECT",
    "*** END OF THIS PROJECT",
    "***END OF THE PROJECT",
    "***END OF THIS PROJECT",
    "END OF THE PROJECT GUTENBERG",
    "END OF THIS PROJECT GUTENBERG",
    "End of the Project Gutenberg",
    "End of The Project Gutenberg",
    "End of this Project Gutenberg",
    "End of Project Gutenberg",
    "Ende dieses Project Gutenberg Etextes",
    "Ende dieses Projekt Gutenberg Etextes",
];

/// The body of a raw book with the delimiter evidence that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped<'a> {
    /// The cleaned body, a contiguous subslice of the raw input.
    pub body: &'a str,
    /// Whether a start delimiter was matched (false means the body was taken
    /// from the first line under the lenient policy).
    pub start_found: bool,
    /// Whether an end delimiter was matched (false means the body runs to
    /// end-of-file under the lenient policy).
    pub end_found: bool,
}

fn is_marker_line(line: &str, markers: &[&str]) -> bool {
    let line = line.trim_start();
    markers.iter().any(|marker| line.starts_with(marker))
}

/// Removes the preamble and postamble from a raw book text.
///
/// Returns the inner span as a contiguous subslice of `raw`, trimmed of
/// surrounding whitespace. Fails with [`CorpusError::BoilerplateNotFound`]
/// only when the heuristics leave no body at all: the delimiters are inverted
/// or the span between them is empty.
pub fn strip_boilerplate(raw: &str) -> Result<Stripped<'_>> {
    // Start delimiter: first matching line from the top wins.
    let mut body_start = 0;
    let mut start_found = false;
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if is_marker_line(line, TEXT_START_MARKERS) {
            body_start = offset + line.len();
            start_found = true;
            break;
        }
        offset += line.len();
    }

    // End delimiter: matching line closest to the end of the file wins. The
    // scan is independent of the start scan, so an end marker above the start
    // marker surfaces as an empty body below.
    let mut body_end = raw.len();
    let mut end_found = false;
    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        if is_marker_line(line, TEXT_END_MARKERS) {
            body_end = offset;
            end_found = true;
        }
        offset += line.len();
    }

    if !start_found {
        warn!("no start-of-text marker found; keeping text from the first line");
    }
    if !end_found {
        warn!("no end-of-text marker found; keeping text to end-of-file");
    }

    if body_end <= body_start {
        return Err(CorpusError::BoilerplateNotFound);
    }

    let body = raw[body_start..body_end].trim();
    if body.is_empty() {
        return Err(CorpusError::BoilerplateNotFound);
    }

    Ok(Stripped {
        body,
        start_found,
        end_found,
    })
}
