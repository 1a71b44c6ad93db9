// Note merging and reconciliation
// Combines note files from several recording sessions into one
// chronologically ordered file with a single begin/end marker pair

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::clock::timecode::StampParts;
use crate::notes::note::{MarkerConfig, Note};
use crate::notes::parser;

/// Merge error types
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("merge destination {0:?} is also a merge input")]
    DestinationIsInput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Common timestamp shape across a set of notes.
///
/// Files from different sessions may have been written at different
/// precisions; chronological comparison and a uniform-looking output both
/// need one shape for everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StampPrecision {
    pub hours: bool,
    pub minutes: bool,
    pub sub_digits: usize,
}

impl StampPrecision {
    /// Widest shape used by any note in the set
    pub fn of_notes(notes: &[Note]) -> Self {
        let mut precision = Self::default();
        for note in notes {
            precision.hours |= note.stamp.hours.is_some();
            precision.minutes |= note.stamp.minutes.is_some();
            if let Some(sub) = &note.stamp.subseconds {
                precision.sub_digits = precision.sub_digits.max(sub.len());
            }
        }
        precision.minutes |= precision.hours;
        precision
    }
}

/// Rewrite one stamp to the common shape.
///
/// Missing hour/minute fields materialize as zero; subseconds are padded
/// on the right, since they are a fractional quantity.
fn conform_stamp(stamp: &mut StampParts, precision: &StampPrecision) {
    if precision.hours {
        stamp.hours = Some(stamp.hours.unwrap_or(0));
    }
    if precision.hours || precision.minutes {
        stamp.minutes = Some(stamp.minutes.unwrap_or(0));
    }
    if precision.sub_digits > 0 {
        let mut sub = stamp.subseconds.take().unwrap_or_default();
        while sub.len() < precision.sub_digits {
            sub.push('0');
        }
        stamp.subseconds = Some(sub);
    }
}

/// Pad every note's timestamp to the common shape of the whole set
pub fn normalize_precision(notes: &mut [Note]) {
    let precision = StampPrecision::of_notes(notes);
    for note in notes {
        conform_stamp(&mut note.stamp, &precision);
    }
}

/// Indices of begin and end marker notes, in slice order
pub fn find_markers(notes: &[Note], config: &MarkerConfig) -> (Vec<usize>, Vec<usize>) {
    let mut begins = Vec::new();
    let mut ends = Vec::new();
    for (index, note) in notes.iter().enumerate() {
        if note.is_marker(&config.begin) {
            begins.push(index);
        } else if note.is_marker(&config.end) {
            ends.push(index);
        }
    }
    (begins, ends)
}

/// Strip marker text from every internal begin/end marker.
///
/// The earliest begin and the latest end stay intact, marking the true
/// bounds of the merged session; the rest are record/stop artifacts and
/// are reduced to bare timestamp lines.
pub fn strip_redundant_markers(notes: &mut [Note], begins: &[usize], ends: &[usize]) {
    for &index in begins.iter().skip(1) {
        notes[index].body.clear();
    }
    if let Some((_, internal)) = ends.split_last() {
        for &index in internal {
            notes[index].body.clear();
        }
    }
}

/// Serialize header lines and notes back to file text
pub fn render_output(header: &[String], notes: &[Note]) -> String {
    let mut out = String::new();
    for line in header {
        out.push_str(line);
        out.push('\n');
    }
    for note in notes {
        out.push_str(&note.render());
        out.push('\n');
    }
    out
}

/// Parse one note file into `(header, notes)`
pub fn parse_output_file<P: AsRef<Path>>(path: P) -> Result<(Vec<String>, Vec<Note>), MergeError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parser::parse_output(&text))
}

/// Merge note files into one ordered stream.
///
/// Notes from all files are sorted by timestamp (stable, so ties keep
/// file-then-parse order), padded to a common precision, and stripped of
/// internal begin/end markers. Headers pass through in input order.
pub fn merge<P: AsRef<Path>>(paths: &[P], config: &MarkerConfig) -> Result<String, MergeError> {
    let mut header = Vec::new();
    let mut notes = Vec::new();
    for path in paths {
        let (file_header, file_notes) = parse_output_file(path)?;
        header.extend(file_header);
        notes.extend(file_notes);
    }
    info!("merging {} notes from {} files", notes.len(), paths.len());

    notes.sort_by(|a, b| a.seconds().total_cmp(&b.seconds()));
    normalize_precision(&mut notes);

    let (begins, ends) = find_markers(&notes, config);
    debug!(
        "found {} begin and {} end markers, stripping internal ones",
        begins.len(),
        ends.len()
    );
    strip_redundant_markers(&mut notes, &begins, &ends);

    Ok(render_output(&header, &notes))
}

/// Merge note files and write the result.
///
/// Refuses to write when the destination is itself one of the inputs,
/// before touching anything on disk.
pub fn merge_to_file<P: AsRef<Path>>(
    paths: &[P],
    dest: &Path,
    config: &MarkerConfig,
) -> Result<(), MergeError> {
    for path in paths {
        if same_path(path.as_ref(), dest) {
            return Err(MergeError::DestinationIsInput(dest.to_path_buf()));
        }
    }
    let merged = merge(paths, config)?;
    std::fs::write(dest, merged)?;
    Ok(())
}

/// Rewrite a single note file in place.
///
/// With `reconcile_only` the timestamps are padded to their common
/// precision without reordering anything; otherwise the notes are also
/// re-sorted chronologically. Whether the file ended with a newline is
/// preserved either way.
pub fn reconcile_or_sort(path: &Path, reconcile_only: bool) -> Result<(), MergeError> {
    let text = std::fs::read_to_string(path)?;
    let ends_with_newline = text.ends_with('\n');

    let (header, mut notes) = parser::parse_output(&text);
    if !reconcile_only {
        notes.sort_by(|a, b| a.seconds().total_cmp(&b.seconds()));
    }
    normalize_precision(&mut notes);

    let mut out = render_output(&header, &notes);
    if !ends_with_newline && out.ends_with('\n') {
        out.pop();
    }
    std::fs::write(path, out)?;
    Ok(())
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::parser::parse_output;
    use std::fs;
    use tempfile::tempdir;

    fn notes_of(text: &str) -> Vec<Note> {
        parse_output(text).1
    }

    #[test]
    fn test_stamp_precision_of_notes() {
        let notes = notes_of("[01:02:03] a\n[05:30] b\n[45.5] c\n");
        let precision = StampPrecision::of_notes(&notes);

        assert!(precision.hours);
        assert!(precision.minutes);
        assert_eq!(precision.sub_digits, 1);

        let notes = notes_of("[05] a\n[45.505] b\n");
        let precision = StampPrecision::of_notes(&notes);
        assert!(!precision.hours);
        assert!(!precision.minutes);
        assert_eq!(precision.sub_digits, 3);
    }

    #[test]
    fn test_normalize_precision() {
        let mut notes = notes_of("[01:02:03] a\n[05:30] b\n[45.5] c\n");
        normalize_precision(&mut notes);

        assert_eq!(notes[0].render(), "[01:02:03.0] a");
        assert_eq!(notes[1].render(), "[00:05:30.0] b");
        assert_eq!(notes[2].render(), "[00:00:45.5] c");
    }

    #[test]
    fn test_normalize_pads_subseconds_right() {
        // Subseconds are fractional: "5" means five tenths, so padding to
        // three digits must produce "500", not "005"
        let mut notes = notes_of("[10.5] a\n[11.505] b\n");
        normalize_precision(&mut notes);

        assert_eq!(notes[0].render(), "[10.500] a");
        assert_eq!(notes[1].render(), "[11.505] b");
    }

    #[test]
    fn test_find_markers() {
        let config = MarkerConfig::default();
        let notes = notes_of(
            "[00:01:00] ##### BEGIN #####\n\
             [00:02:00] a note\n\
             [00:03:00] ##### END #####\n\
             [00:04:00] ##### BEGIN #####\n\
             [00:05:00] ##### END #####\n",
        );

        let (begins, ends) = find_markers(&notes, &config);
        assert_eq!(begins, vec![0, 3]);
        assert_eq!(ends, vec![2, 4]);
    }

    #[test]
    fn test_strip_keeps_first_begin_and_last_end() {
        let config = MarkerConfig::default();
        let mut notes = notes_of(
            "[00:01:00] ##### BEGIN #####\n\
             [00:02:00] ##### END #####\n\
             [00:03:00] ##### BEGIN #####\n\
             [00:04:00] ##### END #####\n",
        );

        let (begins, ends) = find_markers(&notes, &config);
        strip_redundant_markers(&mut notes, &begins, &ends);

        assert_eq!(notes[0].render(), "[00:01:00] ##### BEGIN #####");
        assert_eq!(notes[1].render(), "[00:02:00]");
        assert_eq!(notes[2].render(), "[00:03:00]");
        assert_eq!(notes[3].render(), "[00:04:00] ##### END #####");
    }

    #[test]
    fn test_merge_overlapping_sessions() {
        let dir = tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        let file_b = dir.path().join("b.txt");
        fs::write(&file_a, "[00:01:00] RECORD-BEGIN\n[00:05:00] RECORD-END\n").unwrap();
        fs::write(&file_b, "[00:02:00] RECORD-BEGIN\n[00:03:00] RECORD-END\n").unwrap();

        let config = MarkerConfig {
            begin: "RECORD-BEGIN".to_string(),
            end: "RECORD-END".to_string(),
        };
        let merged = merge(&[&file_a, &file_b], &config).unwrap();

        assert_eq!(
            merged,
            "[00:01:00] RECORD-BEGIN\n\
             [00:02:00]\n\
             [00:03:00]\n\
             [00:05:00] RECORD-END\n"
        );
    }

    #[test]
    fn test_merge_sorts_and_keeps_headers_in_input_order() {
        let dir = tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        let file_b = dir.path().join("b.txt");
        fs::write(&file_a, "header A\n[00:05:00] late\n").unwrap();
        fs::write(&file_b, "header B\n[00:01:00] early\n").unwrap();

        let merged = merge(&[&file_a, &file_b], &MarkerConfig::default()).unwrap();

        assert_eq!(
            merged,
            "header A\nheader B\n[00:01:00] early\n[00:05:00] late\n"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let dir = tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        let file_b = dir.path().join("b.txt");
        let merged_path = dir.path().join("merged.txt");
        fs::write(
            &file_a,
            "[00:01:00] ##### BEGIN #####\n[00:02:00] note\n[00:03:00] ##### END #####\n",
        )
        .unwrap();
        fs::write(
            &file_b,
            "[00:02:30] ##### BEGIN #####\n[00:04:00] ##### END #####\n",
        )
        .unwrap();

        let config = MarkerConfig::default();
        let merged = merge(&[&file_a, &file_b], &config).unwrap();
        fs::write(&merged_path, &merged).unwrap();

        // A second pass over the merged file changes nothing
        let remerged = merge(&[&merged_path], &config).unwrap();
        assert_eq!(remerged, merged);
    }

    #[test]
    fn test_merge_destination_collision() {
        let dir = tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        fs::write(&file_a, "[00:01:00] note\n").unwrap();

        let result = merge_to_file(&[&file_a], &file_a, &MarkerConfig::default());
        assert!(matches!(result, Err(MergeError::DestinationIsInput(_))));

        // The input file is untouched
        assert_eq!(
            fs::read_to_string(&file_a).unwrap(),
            "[00:01:00] note\n"
        );
    }

    #[test]
    fn test_merge_to_file() {
        let dir = tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        let dest = dir.path().join("merged.txt");
        fs::write(&file_a, "[00:02:00] b\n[00:01:00] a\n").unwrap();

        merge_to_file(&[&file_a], &dest, &MarkerConfig::default()).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "[00:01:00] a\n[00:02:00] b\n"
        );
    }

    #[test]
    fn test_reconcile_rewrites_without_reordering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "[00:05:00] late\n[01:00.5] early\n").unwrap();

        reconcile_or_sort(&path, true).unwrap();

        // Order is untouched; precision is unified
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[00:05:00.0] late\n[00:01:00.5] early\n"
        );
    }

    #[test]
    fn test_sort_reorders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "[00:05:00] late\n[00:01:00] early\n").unwrap();

        reconcile_or_sort(&path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[00:01:00] early\n[00:05:00] late\n"
        );
    }

    #[test]
    fn test_reconcile_preserves_missing_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "[00:01:00] a\n[00:02:00] b").unwrap();

        reconcile_or_sort(&path, true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.ends_with('\n'));

        fs::write(&path, "[00:01:00] a\n[00:02:00] b\n").unwrap();
        reconcile_or_sort(&path, true).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_missing_input_file_surfaces_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does_not_exist.txt");

        let result = merge(&[&missing], &MarkerConfig::default());
        assert!(matches!(result, Err(MergeError::Io(_))));
    }
}
