// src/core/sanitize.rs
// Total normalization helpers: every input maps to a defined output, never a
// panic. Garbage in, empty/None out.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Minimal HTML entity decoding: handle `&nbsp;` and `&amp;` only.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Parse a locale-formatted amount out of display text: keep digits, `.`, `,`
/// and `-`; a comma is the decimal separator when no dot is present.
/// `None` for anything that does not parse to a finite number.
pub fn to_number(s: &str) -> Option<f64> {
    let mut kept: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    if kept.contains('.') {
        // Dot is the decimal point; commas are grouping.
        kept.retain(|c| c != ',');
    } else if let Some(i) = kept.find(',') {
        // Comma as decimal separator ("1 234,56").
        kept.replace_range(i..=i, ".");
        kept.retain(|c| c != ',');
    }

    match kept.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => None,
    }
}

/// Date formats the vendor renders besides machine-readable `datetime`
/// attributes. Order matters: first parse wins.
const DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 2] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse display or attribute date text into an ISO-8601 UTC string with
/// millisecond precision (`2024-03-01T00:00:00.000Z`). `None` if unparseable.
pub fn to_date_string(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(ndt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(nd) = NaiveDate::parse_from_str(t, fmt) {
            let ndt = nd.and_hms_opt(0, 0, 0)?;
            return Some(ndt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ws_collapses_and_trims() {
        assert_eq!(normalize_ws(" Jane  Doe "), "Jane Doe");
        assert_eq!(normalize_ws("a\t\n b"), "a b");
        assert_eq!(normalize_ws(""), "");
        assert_eq!(normalize_ws(" \u{0009} \u{000B} "), "");
    }

    #[test]
    fn to_number_strips_currency_noise() {
        assert_eq!(to_number("$1,234.56"), Some(1234.56));
        assert_eq!(to_number("1 234,56 kr"), Some(1234.56));
        assert_eq!(to_number("-42"), Some(-42.0));
        assert_eq!(to_number("0"), Some(0.0));
    }

    #[test]
    fn to_number_is_total() {
        assert_eq!(to_number(""), None);
        assert_eq!(to_number("n/a"), None);
        assert_eq!(to_number("--"), None);
        assert_eq!(to_number("1.2.3"), None);
        assert_eq!(to_number(",,,"), None);
    }

    #[test]
    fn to_date_string_machine_formats() {
        assert_eq!(
            to_date_string("2024-03-01T12:30:00Z").as_deref(),
            Some("2024-03-01T12:30:00.000Z")
        );
        assert_eq!(
            to_date_string("2024-03-01T12:30:00+02:00").as_deref(),
            Some("2024-03-01T10:30:00.000Z")
        );
        assert_eq!(
            to_date_string("2024-03-01").as_deref(),
            Some("2024-03-01T00:00:00.000Z")
        );
    }

    #[test]
    fn to_date_string_display_formats() {
        assert_eq!(
            to_date_string("Mar 1, 2024").as_deref(),
            Some("2024-03-01T00:00:00.000Z")
        );
        assert_eq!(
            to_date_string("03/01/2024").as_deref(),
            Some("2024-03-01T00:00:00.000Z")
        );
    }

    #[test]
    fn to_date_string_is_total() {
        assert_eq!(to_date_string(""), None);
        assert_eq!(to_date_string("soon"), None);
        assert_eq!(to_date_string("2024-13-40"), None);
    }
}
