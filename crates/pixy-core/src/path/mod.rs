//! Path geometry: command grammar, pen tracking, absolute/relative conversion, curve reflection
//! and affine transforms.
//!
//! The pen is the current point threaded through a command sequence. Every [`PathCommand`]
//! remembers the pen it starts from, so it can be converted between absolute and relative mode or
//! transformed independently of its neighbours. `Z` leaves the pen where the last command put it.

mod canonical;
mod format;

pub use canonical::{Segment, canonical_stream};
pub use format::{PathFormatOptions, format_path};

use crate::geom::{Matrix, Point, point};
use crate::number::parse_numbers;
use crate::{Error, Result};
use regex::Regex;

fn command_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([MmLlHhVvAaQqTtCcSsZz])([^MmLlHhVvAaQqTtCcSsZz]*)").expect("valid regex")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizLineTo,
    VertLineTo,
    CubicCurve,
    SmoothCubicCurve,
    QuadCurve,
    SmoothQuadCurve,
    ArcTo,
    ClosePath,
}

impl CommandKind {
    /// Returns the kind and whether the letter selects absolute mode.
    pub fn from_letter(letter: char) -> Option<(Self, bool)> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => Self::MoveTo,
            'L' => Self::LineTo,
            'H' => Self::HorizLineTo,
            'V' => Self::VertLineTo,
            'C' => Self::CubicCurve,
            'S' => Self::SmoothCubicCurve,
            'Q' => Self::QuadCurve,
            'T' => Self::SmoothQuadCurve,
            'A' => Self::ArcTo,
            'Z' => Self::ClosePath,
            _ => return None,
        };
        Some((kind, letter.is_ascii_uppercase()))
    }

    /// Upper-case command letter.
    pub fn letter(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::HorizLineTo => 'H',
            Self::VertLineTo => 'V',
            Self::CubicCurve => 'C',
            Self::SmoothCubicCurve => 'S',
            Self::QuadCurve => 'Q',
            Self::SmoothQuadCurve => 'T',
            Self::ArcTo => 'A',
            Self::ClosePath => 'Z',
        }
    }

    /// Parameters consumed by one command.
    pub fn arity(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo | Self::SmoothQuadCurve => 2,
            Self::HorizLineTo | Self::VertLineTo => 1,
            Self::QuadCurve | Self::SmoothCubicCurve => 4,
            Self::CubicCurve => 6,
            Self::ArcTo => 7,
            Self::ClosePath => 0,
        }
    }

    fn is_pairs(self) -> bool {
        matches!(
            self,
            Self::MoveTo
                | Self::LineTo
                | Self::SmoothQuadCurve
                | Self::QuadCurve
                | Self::CubicCurve
                | Self::SmoothCubicCurve
        )
    }
}

/// Mirror of `control` across `end`.
pub fn reflect(control: Point, end: Point) -> Point {
    end + (end - control)
}

/// Point the pen is left at after `command`, starting from `pen`.
pub fn endpoint(pen: Point, command: &PathCommand) -> Point {
    let v = &command.values;
    let n = v.len();
    match (command.kind, command.absolute) {
        (CommandKind::ClosePath, _) => pen,
        (CommandKind::HorizLineTo, true) => point(v[n - 1], pen.y),
        (CommandKind::VertLineTo, true) => point(pen.x, v[n - 1]),
        (CommandKind::HorizLineTo, false) => point(pen.x + v[n - 1], pen.y),
        (CommandKind::VertLineTo, false) => point(pen.x, pen.y + v[n - 1]),
        (_, true) => point(v[n - 2], v[n - 1]),
        (_, false) => point(pen.x + v[n - 2], pen.y + v[n - 1]),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    kind: CommandKind,
    absolute: bool,
    values: Vec<f64>,
    /// Pen before this command; `None` until something has moved it away from the origin.
    pen: Option<Point>,
}

impl PathCommand {
    pub fn new(kind: CommandKind, absolute: bool, values: Vec<f64>) -> Result<Self> {
        if values.len() != kind.arity() {
            return Err(Error::path_syntax(format!(
                "{} expects {} parameters, got {}",
                kind.letter(),
                kind.arity(),
                values.len()
            )));
        }
        Ok(Self {
            kind,
            absolute,
            values,
            pen: None,
        })
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Command letter, upper-case for absolute mode.
    pub fn letter(&self) -> char {
        let l = self.kind.letter();
        if self.absolute { l } else { l.to_ascii_lowercase() }
    }

    pub fn pen(&self) -> Point {
        self.pen.unwrap_or_else(Point::origin)
    }

    pub fn has_origin_pen(&self) -> bool {
        self.pen.is_none()
    }

    pub fn set_pen(&mut self, pen: Point) {
        self.pen = Some(pen);
    }

    pub fn end_point(&self) -> Point {
        endpoint(self.pen(), self)
    }

    /// Like [`PathCommand::end_point`], but keeps the origin marker through a `Z`.
    fn end_pen(&self) -> Option<Point> {
        match self.kind {
            CommandKind::ClosePath => self.pen,
            _ => Some(self.end_point()),
        }
    }

    /// Absolute position of the last explicit control point of a `C`, `S` or `Q`.
    pub fn last_control_point(&self) -> Option<Point> {
        match self.kind {
            CommandKind::CubicCurve | CommandKind::SmoothCubicCurve | CommandKind::QuadCurve => {
                let n = self.values.len();
                let c = point(self.values[n - 4], self.values[n - 3]);
                if self.absolute {
                    Some(c)
                } else {
                    Some(self.pen() + c.to_vector())
                }
            }
            _ => None,
        }
    }

    /// Last control point mirrored across the endpoint: the implicit first control point of a
    /// following smooth curve.
    ///
    /// `T` carries no explicit control point and yields `None`; see [`Segment`] for the expanded
    /// form.
    pub fn reflected_control_point(&self) -> Option<Point> {
        self.last_control_point()
            .map(|c| reflect(c, self.end_point()))
    }

    pub fn set_absolute(&mut self, absolute: bool) {
        if absolute && !self.absolute {
            self.to_absolute();
        } else if !absolute && self.absolute {
            self.to_relative();
        }
    }

    pub fn to_absolute(&mut self) {
        if self.absolute {
            return;
        }
        self.shift(self.pen(), 1.0);
        self.absolute = true;
    }

    pub fn to_relative(&mut self) {
        if !self.absolute {
            return;
        }
        self.shift(self.pen(), -1.0);
        self.absolute = false;
    }

    fn shift(&mut self, pen: Point, sign: f64) {
        match self.kind {
            k if k.is_pairs() => {
                for pair in self.values.chunks_exact_mut(2) {
                    pair[0] += sign * pen.x;
                    pair[1] += sign * pen.y;
                }
            }
            CommandKind::HorizLineTo => self.values[0] += sign * pen.x,
            CommandKind::VertLineTo => self.values[0] += sign * pen.y,
            CommandKind::ArcTo => {
                self.values[5] += sign * pen.x;
                self.values[6] += sign * pen.y;
            }
            _ => {}
        }
    }

    /// Maps the command through `matrix`.
    ///
    /// The command becomes absolute and `H`/`V` turn into `L`, since an arbitrary transform does
    /// not preserve axis alignment. Arcs are rejected.
    pub fn apply_transform(&mut self, matrix: &Matrix) -> Result<()> {
        self.to_absolute();
        let pen = self.pen();
        match self.kind {
            CommandKind::HorizLineTo => {
                self.values = vec![self.values[0], pen.y];
                self.kind = CommandKind::LineTo;
            }
            CommandKind::VertLineTo => {
                self.values = vec![pen.x, self.values[0]];
                self.kind = CommandKind::LineTo;
            }
            CommandKind::ArcTo => {
                return Err(Error::UnsupportedPathFeature {
                    feature: "transforming elliptical arcs".to_string(),
                });
            }
            _ => {}
        }
        if let Some(pen) = self.pen {
            self.pen = Some(matrix.transform_point(pen));
        }
        for pair in self.values.chunks_exact_mut(2) {
            let p = matrix.transform_point(point(pair[0], pair[1]));
            pair[0] = p.x;
            pair[1] = p.y;
        }
        Ok(())
    }

    /// Rewrites `C`/`Q` as `S`/`T` by dropping the first control point.
    pub(crate) fn make_smooth(&mut self) {
        let kind = match self.kind {
            CommandKind::CubicCurve => CommandKind::SmoothCubicCurve,
            CommandKind::QuadCurve => CommandKind::SmoothQuadCurve,
            _ => return,
        };
        self.values.drain(..2);
        self.kind = kind;
    }
}

/// Splits path geometry into commands.
///
/// A letter followed by several parameter groups repeats itself; after `M`/`m` the repeats are
/// implicit `L`/`l`. Pens are left unset, see [`Path::parse`].
pub fn parse(geometry: &str) -> Result<Vec<PathCommand>> {
    let mut out = Vec::new();
    let mut consumed = 0usize;
    for caps in command_regex().captures_iter(geometry) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !geometry[consumed..whole.start()].trim().is_empty() {
            return Err(Error::path_syntax(&geometry[consumed..whole.start()]));
        }
        consumed = whole.end();

        let Some((mut kind, absolute)) = caps[1].chars().next().and_then(CommandKind::from_letter)
        else {
            return Err(Error::path_syntax(whole.as_str()));
        };
        let values =
            parse_numbers(&caps[2]).map_err(|_| Error::path_syntax(whole.as_str().trim()))?;
        let arity = kind.arity();

        if arity == 0 {
            if !values.is_empty() {
                return Err(Error::path_syntax(whole.as_str().trim()));
            }
            out.push(PathCommand::new(kind, absolute, values)?);
            continue;
        }
        if values.is_empty() || values.len() % arity != 0 {
            return Err(Error::path_syntax(whole.as_str().trim()));
        }
        for group in values.chunks_exact(arity) {
            out.push(PathCommand::new(kind, absolute, group.to_vec())?);
            if kind == CommandKind::MoveTo {
                kind = CommandKind::LineTo;
            }
        }
    }
    if !geometry[consumed..].trim().is_empty() {
        return Err(Error::path_syntax(&geometry[consumed..]));
    }
    Ok(out)
}

/// A parsed path with pens threaded through its commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn parse(geometry: &str) -> Result<Self> {
        Ok(Self::from_commands(parse(geometry)?))
    }

    /// Threads the pen through `commands`, starting from the origin.
    pub fn from_commands(mut commands: Vec<PathCommand>) -> Self {
        let mut pen = None;
        for c in &mut commands {
            c.pen = pen;
            pen = c.end_pen();
        }
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PathCommand> {
        self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_absolute(&mut self) {
        self.commands.iter_mut().for_each(PathCommand::to_absolute);
    }

    pub fn to_relative(&mut self) {
        self.commands.iter_mut().for_each(PathCommand::to_relative);
    }

    pub fn transform(&mut self, matrix: &Matrix) -> Result<()> {
        for c in &mut self.commands {
            c.apply_transform(matrix)?;
        }
        Ok(())
    }

    /// Final pen position.
    pub fn end_point(&self) -> Point {
        self.commands
            .last()
            .and_then(PathCommand::end_pen)
            .unwrap_or_else(Point::origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(cmds: &[PathCommand]) -> String {
        cmds.iter().map(PathCommand::letter).collect()
    }

    #[test]
    fn implicit_lines_follow_move() {
        let cmds = parse("M0,0 10,0 10,10 m1 1 2 2 Z").unwrap();
        assert_eq!(letters(&cmds), "MLLmlZ");
        assert_eq!(cmds[2].values(), &[10.0, 10.0]);
    }

    #[test]
    fn other_letters_repeat_themselves() {
        let cmds = parse("C1 2 3 4 5 6 7 8 9 10 11 12h1 2").unwrap();
        assert_eq!(letters(&cmds), "CChh");
    }

    #[test]
    fn parameter_count_must_match_arity() {
        for bad in ["M1,2,3", "L1", "C1 2 3 4 5", "Z1", "M", "x M0 0", "M0 0 #"] {
            assert!(
                matches!(parse(bad), Err(Error::InvalidPathSyntax { .. })),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn endpoints_follow_mode_and_axis() {
        let pen = point(3.0, 4.0);
        let cmd = |l: char, v: &[f64]| {
            let (k, a) = CommandKind::from_letter(l).unwrap();
            PathCommand::new(k, a, v.to_vec()).unwrap()
        };
        assert_eq!(endpoint(pen, &cmd('H', &[10.0])), point(10.0, 4.0));
        assert_eq!(endpoint(pen, &cmd('v', &[1.0])), point(3.0, 5.0));
        assert_eq!(endpoint(pen, &cmd('L', &[1.0, 2.0])), point(1.0, 2.0));
        assert_eq!(
            endpoint(pen, &cmd('c', &[0.0, 0.0, 1.0, 1.0, 2.0, -2.0])),
            point(5.0, 2.0)
        );
        assert_eq!(endpoint(pen, &cmd('Z', &[])), pen);
    }

    #[test]
    fn reflection_is_a_pure_mirror() {
        assert_eq!(reflect(point(1.0, 1.0), point(2.0, 3.0)), point(3.0, 5.0));
        assert_eq!(reflect(point(2.0, 3.0), point(2.0, 3.0)), point(2.0, 3.0));
    }

    #[test]
    fn reflected_control_point_uses_last_control_pair() {
        let path = Path::parse("M0 0 C0 10 10 10 10 0 c0 0 5 -5 10 0").unwrap();
        let cmds = path.commands();
        assert_eq!(cmds[1].reflected_control_point(), Some(point(10.0, -10.0)));
        // relative: control (15,-5), end (20,0)
        assert_eq!(cmds[2].reflected_control_point(), Some(point(25.0, 5.0)));
        assert_eq!(cmds[0].reflected_control_point(), None);
    }

    #[test]
    fn pens_thread_through_commands_and_close_keeps_pen() {
        let path = Path::parse("m1 1 h4 v4 z l1 1").unwrap();
        let pens: Vec<_> = path.commands().iter().map(|c| c.pen()).collect();
        assert_eq!(
            pens,
            vec![
                point(0.0, 0.0),
                point(1.0, 1.0),
                point(5.0, 1.0),
                point(5.0, 5.0),
                point(5.0, 5.0)
            ]
        );
        assert!(path.commands()[0].has_origin_pen());
        assert_eq!(path.end_point(), point(6.0, 6.0));
    }

    #[test]
    fn relative_absolute_round_trip_preserves_endpoints() {
        let original = Path::parse("M10 10 l5 0 H30 v-7.5 Q40 0 45 5 t5 5 S60 20 70 10 Z L1 2")
            .unwrap();
        let mut path = original.clone();
        path.to_relative();
        assert!(path.commands().iter().all(|c| !c.is_absolute()));
        path.to_absolute();
        for (a, b) in original.commands().iter().zip(path.commands()) {
            let (pa, pb) = (a.end_point(), b.end_point());
            assert!((pa.x - pb.x).abs() < 1e-9 && (pa.y - pb.y).abs() < 1e-9);
        }
    }

    #[test]
    fn transform_turns_axis_lines_into_lines() {
        let mut path = Path::parse("M1 1 H5 v2").unwrap();
        path.transform(&Matrix::translation(10.0, 0.0)).unwrap();
        let cmds = path.commands();
        assert_eq!(letters(cmds), "MLL");
        assert_eq!(cmds[1].values(), &[15.0, 1.0]);
        assert_eq!(cmds[2].values(), &[15.0, 3.0]);
        assert_eq!(cmds[2].pen(), point(15.0, 1.0));
        assert!(cmds[0].has_origin_pen());
    }

    #[test]
    fn transform_rejects_arcs() {
        let mut path = Path::parse("M0 0 A5 5 0 0 1 10 10").unwrap();
        assert!(matches!(
            path.transform(&Matrix::identity()),
            Err(Error::UnsupportedPathFeature { .. })
        ));
    }

    #[test]
    fn arc_endpoint_converts_between_modes() {
        let mut path = Path::parse("M1 1 a5 5 0 0 1 10 10").unwrap();
        path.to_absolute();
        assert_eq!(
            path.commands()[1].values(),
            &[5.0, 5.0, 0.0, 0.0, 1.0, 11.0, 11.0]
        );
    }
}
