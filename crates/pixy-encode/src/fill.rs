use crate::Result;
use crate::ops::Fill;
use pixy_core::{Paint, PropertySource, Rgb, parse_color, parse_opacity, parse_paint};

fn opacity<P: PropertySource + ?Sized>(props: &P, name: &str) -> Result<f64> {
    match props.get(name) {
        Some(v) => Ok(parse_opacity(v)?),
        None => Ok(1.0),
    }
}

/// Reduces the effective `fill`, `opacity` and `fill-opacity` to a solid [`Fill`].
///
/// Returns `None` for `none` and paint-server references, which the encoder cannot draw.
pub fn resolve_fill<P: PropertySource + ?Sized>(props: &P) -> Result<Option<Fill>> {
    let paint = match props.get("fill") {
        Some(v) => parse_paint(v)?,
        None => Paint::Color(Rgb::BLACK),
    };
    let rgb = match paint {
        Paint::None | Paint::Url(_) => return Ok(None),
        Paint::Color(rgb) => rgb,
        Paint::CurrentColor => match props.get("color") {
            Some(v) => parse_color(v)?,
            None => Rgb::BLACK,
        },
    };
    let opacity = opacity(props, "opacity")? * opacity(props, "fill-opacity")?;
    let alpha = (255.0 * opacity).round_ties_even().clamp(0.0, 255.0) as u8;
    Ok(Some(Fill { alpha, rgb }))
}
