//! Gantt date formats are written in dayjs notation (`YYYY-MM-DD`, `HH:mm`, ...). These helpers
//! translate them to `chrono` format strings and parse or print dates with them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Longest spelling first.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("A", "%p"),
    ("a", "%P"),
    ("X", "%s"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("YY", "%y"),
];

/// Converts a dayjs format to a `chrono` strftime string. `[...]` runs are literal text.
pub fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format.trim();
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest[1..].find(']') {
                push_literal(&mut out, &rest[1..1 + end]);
                rest = &rest[end + 2..];
                continue;
            }
        }
        match TOKENS.iter().find(|(pat, _)| rest.starts_with(pat)) {
            Some((pat, spec)) => {
                out.push_str(spec);
                rest = &rest[pat.len()..];
            }
            None => {
                push_literal(&mut out, &rest[..c.len_utf8()]);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Parses `text` with a dayjs `format`. Date-only formats give midnight; time-only formats give
/// that time on 1970-01-01.
pub fn parse_date(text: &str, format: &str) -> Option<NaiveDateTime> {
    let spec = to_chrono_format(format);
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, &spec) {
        return Some(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, &spec) {
        return Some(d.and_time(NaiveTime::MIN));
    }
    let time = NaiveTime::parse_from_str(text, &spec).ok()?;
    NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time))
}

pub fn format_date(dt: NaiveDateTime, format: &str) -> String {
    dt.format(&to_chrono_format(format)).to_string()
}
