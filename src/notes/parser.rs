// Output file parsing
// Splits a note file into verbatim header lines and timestamped notes

use crate::clock::timecode::{self, StampParts};
use crate::notes::note::Note;

/// Split a line into its timestamp prefix and the remaining text.
///
/// A line is timestamped iff it starts with `[`, contains a later `]`,
/// and the bracketed prefix parses as a timestamp. Anything else is
/// continuation text.
pub fn split_stamped(line: &str) -> Option<(StampParts, &str)> {
    if !line.starts_with('[') {
        return None;
    }
    let close = line.find(']')?;
    let stamp = timecode::parse_timestamp(&line[..=close])?;
    Some((stamp, &line[close + 1..]))
}

/// Parse an output file's text into `(header, notes)`.
///
/// Lines before the first timestamped line accumulate into the header and
/// pass through merging verbatim. After that, each non-timestamped line is
/// folded into the body of the most recently started note, which keeps
/// manually added annotations attached to the note they follow.
pub fn parse_output(text: &str) -> (Vec<String>, Vec<Note>) {
    let mut header = Vec::new();
    let mut notes: Vec<Note> = Vec::new();

    for line in text.lines() {
        match split_stamped(line) {
            Some((stamp, rest)) => notes.push(Note::new(stamp, rest.to_string())),
            None => match notes.last_mut() {
                Some(note) => {
                    note.body.push('\n');
                    note.body.push_str(line);
                }
                None => header.push(line.to_string()),
            },
        }
    }

    (header, notes)
}
