use super::{CommandKind, Path, PathCommand, reflect};
use crate::Result;
use crate::geom::{Matrix, Point, point};
use crate::number::format_number;

/// Options for rewriting path geometry as text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFormatOptions {
    /// Emit absolute (`true`) or relative (`false`) commands.
    pub absolute: bool,
    /// Rewrite explicit curves as `S`/`T` when their first control point is the reflection of
    /// the previous one.
    pub shorthand: bool,
    /// Fractional digits; `None` keeps up to eight.
    pub digits: Option<u32>,
    /// Drop a command letter that repeats the previous one (`L1 2L3 4` -> `L1 2 3 4`).
    pub elide_letters: bool,
    /// Transform applied to every coordinate.
    pub transform: Option<Matrix>,
}

impl Default for PathFormatOptions {
    fn default() -> Self {
        Self {
            absolute: true,
            shorthand: false,
            digits: None,
            elide_letters: false,
            transform: None,
        }
    }
}

impl PathFormatOptions {
    fn epsilon(&self) -> f64 {
        match self.digits {
            Some(d) => 10f64.powi(-(d as i32)),
            None => 1.0e-8,
        }
    }
}

fn points_equal(a: Point, b: Point, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
}

fn push_number(out: &mut String, value: f64, digits: Option<u32>) {
    let s = format_number(value, digits);
    if !s.starts_with('-') {
        out.push(' ');
    }
    out.push_str(&s);
}

fn command_text(c: &PathCommand, digits: Option<u32>) -> String {
    let mut body = String::new();
    for v in c.values() {
        push_number(&mut body, *v, digits);
    }
    let mut out = String::with_capacity(body.len() + 1);
    out.push(c.letter());
    out.push_str(body.strip_prefix(' ').unwrap_or(&body));
    out
}

/// Control points a command leaves behind for a following `S` (cubic) or `T` (quadratic).
struct Reflection {
    cubic: Option<Point>,
    quad: Option<Point>,
}

/// Rewrites path geometry with the given options.
///
/// ```
/// use pixy_core::path::{PathFormatOptions, format_path};
/// let opts = PathFormatOptions { absolute: false, ..Default::default() };
/// assert_eq!(format_path("M10 10 L15 10", &opts).unwrap(), "m10 10l5 0");
/// ```
pub fn format_path(geometry: &str, options: &PathFormatOptions) -> Result<String> {
    let path = Path::parse(geometry)?;
    let epsilon = options.epsilon();
    let mut out = String::new();
    let mut prev_letter: Option<char> = None;
    let mut reflection = Reflection {
        cubic: None,
        quad: None,
    };

    for command in path.commands() {
        let mut c = command.clone();
        let mut abs = c.clone();
        abs.to_absolute();
        let pen = abs.pen();
        let v = abs.values();

        let (first_control, next) = match abs.kind() {
            CommandKind::CubicCurve => (
                Some(point(v[0], v[1])),
                Reflection {
                    cubic: Some(point(v[2], v[3])),
                    quad: None,
                },
            ),
            CommandKind::SmoothCubicCurve => (
                None,
                Reflection {
                    cubic: Some(point(v[0], v[1])),
                    quad: None,
                },
            ),
            CommandKind::QuadCurve => (
                Some(point(v[0], v[1])),
                Reflection {
                    cubic: None,
                    quad: Some(point(v[0], v[1])),
                },
            ),
            CommandKind::SmoothQuadCurve => (
                None,
                Reflection {
                    cubic: None,
                    quad: Some(reflection.quad.map_or(pen, |q| reflect(q, pen))),
                },
            ),
            _ => (
                None,
                Reflection {
                    cubic: None,
                    quad: None,
                },
            ),
        };

        if options.shorthand {
            let previous = match abs.kind() {
                CommandKind::CubicCurve => reflection.cubic,
                CommandKind::QuadCurve => reflection.quad,
                _ => None,
            };
            if let (Some(prev), Some(first)) = (previous, first_control) {
                if points_equal(reflect(prev, pen), first, epsilon) {
                    c.make_smooth();
                }
            }
        }
        reflection = next;

        if let Some(m) = &options.transform {
            c.apply_transform(m)?;
        }
        c.set_absolute(options.absolute);

        let text = command_text(&c, options.digits);
        let letter = c.letter();
        let elide = options.elide_letters
            && prev_letter == Some(letter)
            && !matches!(c.kind(), CommandKind::MoveTo | CommandKind::ClosePath);
        if elide {
            let rest = &text[letter.len_utf8()..];
            if !rest.starts_with('-') {
                out.push(' ');
            }
            out.push_str(rest);
        } else {
            out.push_str(&text);
        }
        prev_letter = Some(letter);
    }
    Ok(out)
}
