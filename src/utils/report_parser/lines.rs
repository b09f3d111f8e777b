//! Line parsers for the single-record reports
//!
//! Page and spool utilization reports use `host: Field name: value` lines, the performance
//! report uses `host: FIELD=value`. Both reports trail off into per-volume or monitor settings
//! that are not exported, so parsing stops at a terminator field.

use super::{normalize, FieldValue, MetricRecord};
use once_cell::sync::Lazy;
use regex::Regex;

/// First field of the per-volume section of page and spool reports
pub const COLON_TERMINATOR: &str = "Volume ID";

/// First field of the monitor settings section of the performance report
pub const EQUALS_TERMINATOR: &str = "MONITOR_RATE";

static COLON_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<host>[^:]+): (?P<field>[^:]+): (?P<value>.+)")
        .expect("Invalid colon line regex")
});

static EQUALS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?P<host>[^:]+): (?P<field>[^:=]+)=(?P<value>.+)")
        .expect("Invalid equals line regex")
});

static KILO_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)K$").expect("Invalid kilo value regex"));

static PERCENT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9.]+)%$").expect("Invalid percent value regex"));

/// Trimmed pieces of one report line
struct LineFields<'a> {
    host: &'a str,
    field: &'a str,
    value: &'a str,
}

fn split_line<'a>(pattern: &Regex, line: &'a str) -> Option<LineFields<'a>> {
    let captures = pattern.captures(line)?;
    Some(LineFields {
        host: captures.name("host")?.as_str().trim(),
        field: captures.name("field")?.as_str().trim(),
        value: captures.name("value")?.as_str().trim(),
    })
}

/// Shared loop: host filter, terminator, normalization, last write wins
fn parse_lines<S, F>(
    node_id: &str,
    lines: &[S],
    pattern: &Regex,
    terminator: &str,
    coerce: F,
) -> Vec<MetricRecord>
where
    S: AsRef<str>,
    F: Fn(&str) -> FieldValue,
{
    let mut record = MetricRecord::new();

    for line in lines {
        let Some(fields) = split_line(pattern, line.as_ref()) else {
            continue;
        };
        if fields.host != node_id {
            continue;
        }
        if fields.field == terminator {
            break;
        }
        record.insert(normalize(fields.field), coerce(fields.value));
    }

    vec![record]
}

/// `93920K` -> 93920, other integers as is, anything else kept as text
fn coerce_kilo_int(value: &str) -> FieldValue {
    match KILO_VALUE.captures(value).and_then(|c| c.get(1)) {
        Some(digits) => match digits.as_str().parse::<i64>() {
            Ok(kilo) => FieldValue::Int(kilo),
            Err(_) => FieldValue::Text(value.to_string()),
        },
        None => FieldValue::int_or_text(value),
    }
}

/// `2.125%` -> 0.02125, other floats as is, anything else kept as text
fn coerce_percent_float(value: &str) -> FieldValue {
    match PERCENT_VALUE.captures(value).and_then(|c| c.get(1)) {
        Some(number) => match number.as_str().parse::<f64>() {
            Ok(percent) => FieldValue::Float(percent / 100.0),
            Err(_) => FieldValue::Text(value.to_string()),
        },
        None => FieldValue::float_or_text(value),
    }
}

/// Parse a page or spool utilization report
///
/// Always returns exactly one record, empty when no line matched.
pub fn parse_colon<S: AsRef<str>>(node_id: &str, lines: &[S]) -> Vec<MetricRecord> {
    parse_lines(node_id, lines, &COLON_LINE, COLON_TERMINATOR, coerce_kilo_int)
}

/// Parse a performance information (cpu/memory) report
///
/// Always returns exactly one record, empty when no line matched.
pub fn parse_equals<S: AsRef<str>>(node_id: &str, lines: &[S]) -> Vec<MetricRecord> {
    parse_lines(
        node_id,
        lines,
        &EQUALS_LINE,
        EQUALS_TERMINATOR,
        coerce_percent_float,
    )
}
