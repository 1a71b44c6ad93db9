// Note line output
// Serializes live notes and session markers in the output-file format

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::clock::timecode;
use crate::notes::merge::MergeError;
use crate::notes::note::MarkerConfig;

/// Format a note line: bracketed timestamp, one space, the note text
pub fn note_line(seconds: f64, text: &str) -> String {
    let stamp = timecode::fields_to_timestamp(&timecode::split_seconds(seconds), true);
    if text.is_empty() {
        stamp
    } else {
        format!("{stamp} {text}")
    }
}

/// Marker line emitted by a record action
pub fn begin_marker_line(seconds: f64, config: &MarkerConfig) -> String {
    note_line(seconds, &config.begin)
}

/// Marker line emitted by a stop action
pub fn end_marker_line(seconds: f64, config: &MarkerConfig) -> String {
    note_line(seconds, &config.end)
}

/// Append one line to a note file, creating the file when missing
pub fn append_line<P: AsRef<Path>>(path: P, line: &str) -> Result<(), MergeError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
