// Timecode - Elapsed-time field conversions
// Handles conversion between seconds, (hours, minutes, seconds, centis)
// fields, and bracketed timestamp strings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hard ceiling for any elapsed time: 99h 59m 59.99s.
pub const MAX_TIME_SECONDS: f64 = 359_999.99;

/// Canonical numeric form of an elapsed time.
///
/// Subseconds are stored as hundredths (0-99). Conversions that round a
/// fractional part up to a full second carry into the seconds field rather
/// than producing an illegal centis value of 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFields {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub centis: u32,
}

impl TimeFields {
    /// Creates a new field tuple
    pub fn new(hours: u32, minutes: u32, seconds: u32, centis: u32) -> Self {
        assert!(minutes < 60, "minutes field must be 0-59");
        assert!(seconds < 60, "seconds field must be 0-59");
        assert!(centis < 100, "centis field must be 0-99");
        Self {
            hours,
            minutes,
            seconds,
            centis,
        }
    }

    /// All-zero reading
    pub fn zero() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            centis: 0,
        }
    }
}

impl fmt::Display for TimeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

/// Split a seconds reading into display fields.
///
/// Hours, minutes and whole seconds are floored; the fractional remainder
/// is rounded to hundredths. A remainder that rounds to a full second
/// carries upward through seconds, minutes and hours.
pub fn split_seconds(total: f64) -> TimeFields {
    let total = total.max(0.0);

    let mut hours = (total / 3600.0).floor() as u32;
    let remainder = total - hours as f64 * 3600.0;
    let mut minutes = (remainder / 60.0).floor() as u32;
    let remainder = remainder - minutes as f64 * 60.0;
    let mut seconds = remainder.floor() as u32;
    let mut centis = ((remainder - remainder.floor()) * 100.0).round() as u32;

    if centis == 100 {
        centis = 0;
        seconds += 1;
    }
    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    if minutes == 60 {
        minutes = 0;
        hours += 1;
    }

    TimeFields {
        hours,
        minutes,
        seconds,
        centis,
    }
}

/// Split a seconds reading into left-padded field strings.
///
/// With `pad == 0` the fields are formatted without padding.
pub fn split_seconds_padded(total: f64, pad: usize) -> (String, String, String, String) {
    let fields = split_seconds(total);
    (
        format!("{:0>pad$}", fields.hours),
        format!("{:0>pad$}", fields.minutes),
        format!("{:0>pad$}", fields.seconds),
        format!("{:0>pad$}", fields.centis),
    )
}

/// Join display fields back into seconds
pub fn fields_to_seconds(fields: &TimeFields) -> f64 {
    fields.hours as f64 * 3600.0
        + fields.minutes as f64 * 60.0
        + fields.seconds as f64
        + fields.centis as f64 / 100.0
}

/// Build a timestamp string from display fields.
///
/// Hours appear only when non-zero, minutes when non-zero or preceded by
/// hours, seconds always. Non-zero centis are appended after a `.`. All
/// emitted fields are zero-padded to two digits.
pub fn fields_to_timestamp(fields: &TimeFields, include_brackets: bool) -> String {
    let mut out = String::new();
    if include_brackets {
        out.push('[');
    }
    if fields.hours > 0 {
        out.push_str(&format!("{:02}:", fields.hours));
    }
    if fields.hours > 0 || fields.minutes > 0 {
        out.push_str(&format!("{:02}:", fields.minutes));
    }
    out.push_str(&format!("{:02}", fields.seconds));
    if fields.centis > 0 {
        out.push_str(&format!(".{:02}", fields.centis));
    }
    if include_brackets {
        out.push(']');
    }
    out
}

/// Padded full-width reading used for the live clock display
pub fn format_elapsed(total: f64) -> String {
    split_seconds(total).to_string()
}

/// A parsed timestamp that remembers which fields were actually written.
///
/// Hours and minutes are `None` when the source text omitted them;
/// subseconds keep their raw digit string so that `"5"` (five tenths) and
/// `"50"` (fifty hundredths) stay distinguishable until a merge decides on
/// a common precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampParts {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: u32,
    pub subseconds: Option<String>,
}

impl StampParts {
    /// Build canonical parts from a seconds reading, hundredths precision
    pub fn from_seconds(total: f64) -> Self {
        let fields = split_seconds(total);
        Self {
            hours: Some(fields.hours),
            minutes: Some(fields.minutes),
            seconds: fields.seconds,
            subseconds: if fields.centis > 0 {
                Some(format!("{:02}", fields.centis))
            } else {
                None
            },
        }
    }

    /// Elapsed seconds represented by these parts
    pub fn to_seconds(&self) -> f64 {
        let mut total = self.hours.unwrap_or(0) as f64 * 3600.0
            + self.minutes.unwrap_or(0) as f64 * 60.0
            + self.seconds as f64;
        if let Some(sub) = &self.subseconds {
            if let Ok(digits) = sub.parse::<u64>() {
                total += digits as f64 / 10f64.powi(sub.len() as i32);
            }
        }
        total
    }

    /// Serialize back to a bracketed timestamp with the fields as stored
    pub fn render(&self) -> String {
        let mut out = String::from("[");
        if let Some(hours) = self.hours {
            out.push_str(&format!("{hours:02}:"));
        }
        if let Some(minutes) = self.minutes {
            out.push_str(&format!("{minutes:02}:"));
        }
        out.push_str(&format!("{:02}", self.seconds));
        if let Some(sub) = &self.subseconds {
            out.push('.');
            out.push_str(sub);
        }
        out.push(']');
        out
    }
}

/// Validate a colon-separated field: 1-2 numeric characters
fn parse_field(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse a timestamp such as `[00:01:23.50]` back into its parts.
///
/// One leading `[` and one trailing `]` are stripped when present. The
/// hour, minute and second fields must each be 1-2 digits; the subsecond
/// field may be any number of digits. Returns `None` on any violation,
/// which is how note-file lines are classified as timestamped or plain
/// continuation text.
pub fn parse_timestamp(text: &str) -> Option<StampParts> {
    let text = text.strip_prefix('[').unwrap_or(text);
    let text = text.strip_suffix(']').unwrap_or(text);

    let mut fields: Vec<&str> = text.split(':').collect();
    if fields.is_empty() || fields.len() > 3 {
        return None;
    }

    let last = fields.pop().unwrap_or_default();
    let (seconds_text, subseconds) = match last.split_once('.') {
        Some((secs, sub)) => {
            if sub.is_empty() || !sub.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (secs, Some(sub.to_string()))
        }
        None => (last, None),
    };

    let seconds = parse_field(seconds_text)?;
    let (hours, minutes) = match fields.len() {
        0 => (None, None),
        1 => (None, Some(parse_field(fields[0])?)),
        _ => (Some(parse_field(fields[0])?), Some(parse_field(fields[1])?)),
    };

    Some(StampParts {
        hours,
        minutes,
        seconds,
        subseconds,
    })
}

/// Render a duration as an English phrase.
///
/// Zero-valued fields are omitted, components are joined with commas and
/// a final `and`, and an all-zero duration reads `"0 seconds"`.
pub fn spoken_duration(hours: u32, minutes: u32, seconds: u32) -> String {
    fn unit(value: u32, name: &str) -> String {
        if value == 1 {
            format!("1 {name}")
        } else {
            format!("{value} {name}s")
        }
    }

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if seconds > 0 {
        parts.push(unit(seconds, "second"));
    }

    match parts.split_last() {
        None => "0 seconds".to_string(),
        Some((only, [])) => only.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}
