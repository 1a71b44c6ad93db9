// Note representation for timestamped output files
// A note is one bracketed-timestamp line plus any continuation lines

use serde::{Deserialize, Serialize};

use crate::clock::timecode::StampParts;

/// A single timestamped note parsed from an output file.
///
/// `body` holds everything after the closing bracket of the timestamp,
/// normally beginning with the single separator space, plus any
/// continuation lines joined with their newlines. Keeping the raw text
/// makes re-serialization byte-faithful for untouched notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub stamp: StampParts,
    pub body: String,
}

impl Note {
    pub fn new(stamp: StampParts, body: String) -> Self {
        Self { stamp, body }
    }

    /// Elapsed seconds of this note's timestamp
    pub fn seconds(&self) -> f64 {
        self.stamp.to_seconds()
    }

    /// True when the body is exactly the given marker literal.
    ///
    /// Continuation lines disqualify a note: an annotated marker is user
    /// content, not a structural artifact.
    pub fn is_marker(&self, literal: &str) -> bool {
        !literal.is_empty() && !self.body.contains('\n') && self.body.trim() == literal
    }

    /// Serialize back to output-file lines (without a trailing newline)
    pub fn render(&self) -> String {
        format!("{}{}", self.stamp.render(), self.body)
    }
}

/// Configured begin/end recording marker literals.
///
/// A record action emits the begin literal as a note body, a stop emits
/// the end literal; the merge pipeline uses the same literals to identify
/// which marker notes are artifacts of intermediate record/stop cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub begin: String,
    pub end: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            begin: "##### BEGIN #####".to_string(),
            end: "##### END #####".to_string(),
        }
    }
}
