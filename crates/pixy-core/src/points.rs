//! Conversion of basic shapes (`polygon`, `polyline`, `line`) into path geometry.

use crate::Result;
use crate::number::{format_number, parse_numbers};

fn pairs_to_path(values: &[f64], close: bool) -> String {
    let mut out = String::new();
    for (i, pair) in values.chunks_exact(2).enumerate() {
        out.push(if i == 0 { 'M' } else { 'L' });
        out.push_str(&format_number(pair[0], None));
        out.push(' ');
        out.push_str(&format_number(pair[1], None));
    }
    if close && !out.is_empty() {
        out.push('Z');
    }
    out
}

/// Converts a `points` list into path geometry. A trailing unpaired coordinate is dropped.
pub fn points_to_path(points: &str, close: bool) -> Result<String> {
    let values = parse_numbers(points)?;
    Ok(pairs_to_path(&values, close))
}

pub fn line_to_path(x1: f64, y1: f64, x2: f64, y2: f64) -> String {
    pairs_to_path(&[x1, y1, x2, y2], false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_closes_and_polyline_does_not() {
        assert_eq!(points_to_path("0,0 10,0 10,10", true).unwrap(), "M0 0L10 0L10 10Z");
        assert_eq!(points_to_path("0,0 10,0 10,10", false).unwrap(), "M0 0L10 0L10 10");
    }

    #[test]
    fn drops_unpaired_trailing_coordinate() {
        assert_eq!(points_to_path("1 2 3", false).unwrap(), "M1 2");
        assert_eq!(points_to_path("", true).unwrap(), "");
    }

    #[test]
    fn line_becomes_two_point_path() {
        assert_eq!(line_to_path(0.5, 1.0, -2.0, 3.0), "M0.5 1L-2 3");
    }
}
