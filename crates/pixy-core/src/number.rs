use crate::{Error, Result};
use regex::Regex;

/// Digits used when formatting without an explicit precision.
pub const DEFAULT_DIGITS: u32 = 8;

fn number_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[+-]?(?:\d+\.\d*|\d*\.\d+|\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

fn is_separator(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace() || c == ',')
}

/// Splits a run of SVG numbers (`"1,2 -3.5e1.5"`) into values.
///
/// Numbers may be separated by whitespace, commas, or nothing at all when the next number starts
/// with a sign or a second decimal point. Anything else is an error.
pub fn parse_numbers(text: &str) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    let mut consumed = 0usize;
    for m in number_regex().find_iter(text) {
        if !is_separator(&text[consumed..m.start()]) {
            return Err(Error::InvalidNumber {
                value: text.to_string(),
            });
        }
        let v = m.as_str().parse::<f64>().map_err(|_| Error::InvalidNumber {
            value: m.as_str().to_string(),
        })?;
        out.push(v);
        consumed = m.end();
    }
    if !is_separator(&text[consumed..]) {
        return Err(Error::InvalidNumber {
            value: text.to_string(),
        });
    }
    Ok(out)
}

/// Parses a length attribute such as `"100"`, `"12.5px"`.
pub fn parse_length(text: &str) -> Result<f64> {
    let t = text.trim();
    let t = t.strip_suffix("px").unwrap_or(t).trim_end();
    t.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidNumber {
            value: text.to_string(),
        })
}

/// Formats `value` with at most `digits` fractional digits, trimming trailing zeros.
pub fn format_number(value: f64, digits: Option<u32>) -> String {
    let digits = digits.unwrap_or(DEFAULT_DIGITS) as usize;
    let mut out = format!("{value:.digits$}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numbers_handles_compact_forms() {
        assert_eq!(parse_numbers("1,2 3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_numbers("-1-2").unwrap(), vec![-1.0, -2.0]);
        assert_eq!(parse_numbers(".5.5").unwrap(), vec![0.5, 0.5]);
        assert_eq!(parse_numbers("1e2,+3E-1").unwrap(), vec![100.0, 0.3]);
        assert_eq!(parse_numbers("  ").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn parse_numbers_rejects_garbage() {
        assert!(matches!(
            parse_numbers("1 # 2"),
            Err(Error::InvalidNumber { .. })
        ));
        assert!(parse_numbers("1 2 x").is_err());
    }

    #[test]
    fn parse_length_accepts_px_suffix() {
        assert_eq!(parse_length("100").unwrap(), 100.0);
        assert_eq!(parse_length(" 12.5px ").unwrap(), 12.5);
        assert!(parse_length("10%").is_err());
    }

    #[test]
    fn format_number_trims_trailing_zeros() {
        assert_eq!(format_number(1.0, None), "1");
        assert_eq!(format_number(1.25, None), "1.25");
        assert_eq!(format_number(1.23456, Some(2)), "1.23");
        assert_eq!(format_number(-0.0001, Some(2)), "0");
        assert_eq!(format_number(100.0, Some(0)), "100");
    }
}
