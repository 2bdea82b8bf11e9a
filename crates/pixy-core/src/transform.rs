//! SVG `transform` attribute parsing.

use crate::geom::Matrix;
use crate::number::parse_numbers;
use crate::{Error, Result};
use regex::Regex;

fn transform_fn_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").expect("valid regex"))
}

fn invalid(value: &str) -> Error {
    Error::InvalidTransform {
        value: value.to_string(),
    }
}

fn parse_one(name: &str, args: &[f64], raw: &str) -> Result<Matrix> {
    match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Ok(Matrix::new(a, b, c, d, e, f)),
        ("translate", &[x]) => Ok(Matrix::translation(x, 0.0)),
        ("translate", &[x, y]) => Ok(Matrix::translation(x, y)),
        ("scale", &[s]) => Ok(Matrix::scaling(s, s)),
        ("scale", &[x, y]) => Ok(Matrix::scaling(x, y)),
        ("rotate", &[deg]) => Ok(Matrix::rotation(deg)),
        ("rotate", &[deg, cx, cy]) => {
            let mut m = Matrix::translation(cx, cy);
            m.rotate(deg);
            m.translate(-cx, -cy);
            Ok(m)
        }
        _ => Err(invalid(raw)),
    }
}

/// Parses a transform list and composes it onto `parent`, left to right.
pub fn parse_transform(parent: &Matrix, value: &str) -> Result<Matrix> {
    let mut m = *parent;
    let mut consumed = 0usize;
    for caps in transform_fn_regex().captures_iter(value) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !value[consumed..whole.start()]
            .chars()
            .all(|c| c.is_whitespace() || c == ',')
        {
            return Err(invalid(value));
        }
        consumed = whole.end();
        let name = &caps[1];
        let args = parse_numbers(&caps[2]).map_err(|_| invalid(whole.as_str()))?;
        m.multiply(&parse_one(name, &args, whole.as_str())?);
    }
    if !value[consumed..].trim().is_empty() {
        return Err(invalid(value));
    }
    Ok(m)
}
