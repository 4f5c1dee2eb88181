//! Parses IEC 61131-3 TIME literals into a millisecond count.
//!
//! Literals take the form `T#`/`TIME#` (case-insensitive) followed by one
//! or more `<number><unit>` segments, units `d`, `h`, `m`, `s`, `ms`,
//! e.g. `T#1h30m`, `T#500ms`. Segments accumulate with `time::Duration`
//! so a duration like `T#1h90m` is legal and simply carries past the hour
//! boundary.
use time::Duration;

/// Returns the literal's value in milliseconds, or `None` if `text` is
/// not a `T#`/`TIME#`-prefixed literal.
pub fn parse_time_literal(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();
    let rest = if let Some(r) = lower.strip_prefix("time#") {
        r
    } else if let Some(r) = lower.strip_prefix("t#") {
        r
    } else {
        return None;
    };

    let mut duration = Duration::ZERO;
    let mut chars = rest.chars().peekable();
    let mut any_segment = false;

    while chars.peek().is_some() {
        let mut number = String::new();
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit() || *c == '.') {
            number.push(chars.next().unwrap());
        }
        if number.is_empty() {
            return None;
        }
        let mut unit = String::new();
        while matches!(chars.peek(), Some(c) if c.is_ascii_alphabetic()) {
            unit.push(chars.next().unwrap());
        }
        let value: f64 = number.parse().ok()?;
        let segment = match unit.as_str() {
            "d" => Duration::seconds_f64(value * 86_400.0),
            "h" => Duration::seconds_f64(value * 3_600.0),
            "m" => Duration::seconds_f64(value * 60.0),
            "s" => Duration::seconds_f64(value),
            "ms" => Duration::milliseconds(value as i64),
            _ => return None,
        };
        duration += segment;
        any_segment = true;
    }

    if !any_segment {
        return None;
    }
    Some(duration.whole_milliseconds() as i64)
}
