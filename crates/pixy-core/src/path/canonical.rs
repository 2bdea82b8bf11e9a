use super::{CommandKind, Path, reflect};
use crate::geom::{Point, point};
use crate::{Error, Result};
use serde::Serialize;

/// One command of the canonical stream: absolute, fully expanded, restricted to `M L Q C Z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

impl Segment {
    /// Builds a segment from a letter and absolute parameters.
    ///
    /// Only `M`, `L`, `Q`, `C` and `Z` with their exact parameter counts are accepted.
    pub fn from_letter(letter: char, values: &[f64]) -> Result<Self> {
        let p = |i: usize| point(values[i], values[i + 1]);
        match (letter, values.len()) {
            ('M', 2) => Ok(Self::MoveTo(p(0))),
            ('L', 2) => Ok(Self::LineTo(p(0))),
            ('Q', 4) => Ok(Self::QuadTo(p(0), p(2))),
            ('C', 6) => Ok(Self::CubicTo(p(0), p(2), p(4))),
            ('Z', 0) => Ok(Self::Close),
            _ => Err(Error::path_syntax(format!("{letter}{values:?}"))),
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::MoveTo(_) => 'M',
            Self::LineTo(_) => 'L',
            Self::QuadTo(..) => 'Q',
            Self::CubicTo(..) => 'C',
            Self::Close => 'Z',
        }
    }

    pub fn points(&self) -> Vec<Point> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => vec![p],
            Self::QuadTo(c, p) => vec![c, p],
            Self::CubicTo(c1, c2, p) => vec![c1, c2, p],
            Self::Close => Vec::new(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.points().into_iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

impl Path {
    /// Expands the path into its canonical stream.
    ///
    /// `S`/`T` receive the reflection of the previous curve's last control point (or the pen
    /// when the previous command was not a curve of the same family), `H`/`V` become `L`. Arcs
    /// are unsupported.
    pub fn canonical(&self) -> Result<Vec<Segment>> {
        let mut out = Vec::with_capacity(self.commands.len());
        let mut prev_cubic: Option<Point> = None;
        let mut prev_quad: Option<Point> = None;
        for command in &self.commands {
            let mut c = command.clone();
            c.to_absolute();
            let pen = c.pen();
            let v = c.values();
            let segment = match c.kind() {
                CommandKind::HorizLineTo | CommandKind::VertLineTo => {
                    Segment::LineTo(c.end_point())
                }
                CommandKind::SmoothCubicCurve => {
                    let c1 = prev_cubic.map_or(pen, |ctrl| reflect(ctrl, pen));
                    Segment::CubicTo(c1, point(v[0], v[1]), point(v[2], v[3]))
                }
                CommandKind::SmoothQuadCurve => {
                    let ctrl = prev_quad.map_or(pen, |ctrl| reflect(ctrl, pen));
                    Segment::QuadTo(ctrl, point(v[0], v[1]))
                }
                CommandKind::ArcTo => {
                    return Err(Error::UnsupportedPathFeature {
                        feature: "elliptical arc".to_string(),
                    });
                }
                kind => Segment::from_letter(kind.letter(), v)?,
            };
            prev_cubic = match segment {
                Segment::CubicTo(_, c2, _) => Some(c2),
                _ => None,
            };
            prev_quad = match segment {
                Segment::QuadTo(ctrl, _) => Some(ctrl),
                _ => None,
            };
            out.push(segment);
        }
        Ok(out)
    }
}

/// Parses `geometry` and returns its canonical stream.
pub fn canonical_stream(geometry: &str) -> Result<Vec<Segment>> {
    Path::parse(geometry)?.canonical()
}
