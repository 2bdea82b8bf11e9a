use crate::{Error, Result};

/// Parses an opacity value (`0.5`, `50%`), clamped to `[0, 1]`.
pub fn parse_opacity(value: &str) -> Result<f64> {
    let v = value.trim();
    let (raw, scale) = match v.strip_suffix('%') {
        Some(pct) => (pct, 100.0),
        None => (v, 1.0),
    };
    let parsed = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
        .ok_or_else(|| Error::InvalidOpacity {
            value: value.to_string(),
        })?;
    Ok((parsed / scale).clamp(0.0, 1.0))
}
