//! Turns canonical path streams and structural directives into operations.

use crate::ops::{Compose, Fill, MAX_RUN, Operation, SCALE, VectorKind, VectorRun};
use crate::palette::Palette;
use crate::{Error, Result};
use pixy_core::{Point, Segment};

fn scale(v: f64) -> Result<i32> {
    let scaled = (v * SCALE).round_ties_even();
    if !scaled.is_finite() || scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
        return Err(Error::overflow("coordinate", scaled as i64));
    }
    Ok(scaled as i32)
}

fn delta(p: (i32, i32), pen: (i32, i32)) -> Result<(i32, i32)> {
    let dx = p.0.checked_sub(pen.0);
    let dy = p.1.checked_sub(pen.1);
    match (dx, dy) {
        (Some(dx), Some(dy)) => Ok((dx, dy)),
        _ => Err(Error::overflow("vector component", i64::from(p.0) - i64::from(pen.0))),
    }
}

/// Per-conversion encoder state: the operation sequence, the palette and the fill of the most
/// recent compose.
#[derive(Debug, Default)]
pub struct OpBuilder {
    ops: Vec<Operation>,
    palette: Palette,
    previous: Option<Fill>,
}

impl OpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn into_parts(self) -> (Vec<Operation>, Palette) {
        (self.ops, self.palette)
    }

    /// Appends `op`, applying the merge and replace rules.
    ///
    /// A vector run extends a trailing run of the same kind up to [`MAX_RUN`] segments and
    /// spills the rest into new runs. A group or detail marker replaces a trailing group or
    /// detail marker; the end marker only replaces a trailing group. Everything else is appended
    /// as is.
    pub fn push(&mut self, op: Operation) {
        tracing::trace!(?op, "push");
        match op {
            Operation::VectorRun(run) => self.push_run(run),
            Operation::Group { .. } | Operation::Detail { .. } => {
                if self.ops.last().is_some_and(Operation::is_marker) {
                    self.ops.pop();
                }
                self.ops.push(op);
            }
            Operation::End => {
                if matches!(self.ops.last(), Some(Operation::Group { .. })) {
                    self.ops.pop();
                }
                self.ops.push(op);
            }
            op => self.ops.push(op),
        }
    }

    fn push_run(&mut self, mut run: VectorRun) {
        let per = run.kind.points();
        if let Some(Operation::VectorRun(last)) = self.ops.last_mut() {
            if last.kind == run.kind {
                let room = MAX_RUN.saturating_sub(last.count());
                let take = (room * per).min(run.vectors.len());
                last.vectors.extend(run.vectors.drain(..take));
            }
        }
        for chunk in run.vectors.chunks(MAX_RUN * per) {
            self.ops
                .push(Operation::VectorRun(VectorRun::new(run.kind, chunk.to_vec())));
        }
    }

    /// Emits a compose for `fill`, promoting its color in the palette.
    pub fn compose(&mut self, fill: Fill) -> Result<()> {
        let previous = self.previous == Some(fill);
        self.palette.observe(fill.rgb)?;
        self.push(Operation::Compose(Compose { fill, previous }));
        self.previous = Some(fill);
        Ok(())
    }

    /// Encodes one path's canonical stream filled with `fill`.
    ///
    /// Every subpath starts from the device origin, and each `M` or `Z` after the first command
    /// closes the region traced so far with a compose.
    pub fn add_path(&mut self, segments: &[Segment], fill: Fill) -> Result<()> {
        let mut pen = (0, 0);
        let mut drawn = false;
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::MoveTo(_) | Segment::Close) {
                self.compose(fill)?;
                drawn = false;
                pen = (0, 0);
            }
            let kind = match segment {
                Segment::MoveTo(_) | Segment::LineTo(_) => VectorKind::Line,
                Segment::QuadTo(..) => VectorKind::QuadSpline,
                Segment::CubicTo(..) => VectorKind::CubicSpline,
                Segment::Close => continue,
            };
            pen = self.push_segment(kind, &segment.points(), pen)?;
            drawn = true;
        }
        if drawn {
            self.compose(fill)?;
        }
        Ok(())
    }

    fn push_segment(
        &mut self,
        kind: VectorKind,
        points: &[Point],
        pen: (i32, i32),
    ) -> Result<(i32, i32)> {
        let mut vectors = Vec::with_capacity(points.len());
        let mut end = pen;
        for p in points {
            end = (scale(p.x)?, scale(p.y)?);
            vectors.push(delta(end, pen)?);
        }
        self.push(Operation::VectorRun(VectorRun::new(kind, vectors)));
        Ok(end)
    }

    /// `detail_<N>`; level zero emits nothing.
    pub fn detail(&mut self, level: u32) {
        if level != 0 {
            tracing::debug!(level, "detail");
            self.push(Operation::Detail { level });
        }
    }

    /// Entering `choice_<G>_<V>`. The previous-fill memo does not cross into a choice.
    pub fn enter_choice(&mut self, group: u8) {
        tracing::debug!(group, "enter choice");
        self.push(Operation::Group { id: group });
        self.previous = None;
    }

    pub fn exit_choice(&mut self) {
        tracing::debug!("exit choice");
        self.push(Operation::Group { id: 0 });
    }

    pub fn end(&mut self) {
        self.push(Operation::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixy_core::{Rgb, canonical_stream, point};

    fn line_run(n: usize) -> Operation {
        Operation::VectorRun(VectorRun::new(VectorKind::Line, vec![(1, 1); n]))
    }

    fn run_counts(b: &OpBuilder) -> Vec<usize> {
        b.operations()
            .iter()
            .filter_map(|op| match op {
                Operation::VectorRun(r) => Some(r.count()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn line_runs_coalesce_up_to_sixteen() {
        let mut b = OpBuilder::new();
        b.push(line_run(10));
        b.push(line_run(5));
        assert_eq!(run_counts(&b), vec![15]);

        let mut b = OpBuilder::new();
        b.push(line_run(10));
        b.push(line_run(10));
        assert_eq!(run_counts(&b), vec![16, 4]);
    }

    #[test]
    fn runs_of_different_kinds_do_not_merge() {
        let mut b = OpBuilder::new();
        b.push(line_run(2));
        b.push(Operation::VectorRun(VectorRun::new(
            VectorKind::QuadSpline,
            vec![(0, 0); 4],
        )));
        b.push(line_run(1));
        assert_eq!(run_counts(&b), vec![2, 2, 1]);
    }

    #[test]
    fn compose_never_merges() {
        let mut b = OpBuilder::new();
        let fill = Fill::opaque(Rgb::BLACK);
        b.compose(fill).unwrap();
        b.compose(fill).unwrap();
        assert_eq!(b.operations().len(), 2);
        assert_eq!(
            b.operations()[1],
            Operation::Compose(Compose {
                fill,
                previous: true
            })
        );
    }

    #[test]
    fn markers_replace_trailing_markers() {
        let mut b = OpBuilder::new();
        b.detail(1);
        b.enter_choice(3);
        assert_eq!(b.operations(), &[Operation::Group { id: 3 }]);
        b.exit_choice();
        assert_eq!(b.operations(), &[Operation::Group { id: 0 }]);
        b.end();
        assert_eq!(b.operations(), &[Operation::End]);
        b.detail(0);
        assert_eq!(b.operations(), &[Operation::End]);
    }

    #[test]
    fn end_keeps_a_trailing_detail() {
        let mut b = OpBuilder::new();
        b.detail(2);
        b.end();
        assert_eq!(
            b.operations(),
            &[Operation::Detail { level: 2 }, Operation::End]
        );
    }

    #[test]
    fn closed_square_encodes_three_line_points_then_compose() {
        let mut b = OpBuilder::new();
        let segments = canonical_stream("M0,0 L10,0 L10,10 Z").unwrap();
        b.add_path(&segments, Fill::opaque(Rgb::BLACK)).unwrap();
        assert_eq!(
            b.operations(),
            &[
                Operation::VectorRun(VectorRun::new(
                    VectorKind::Line,
                    vec![(0, 0), (160, 0), (0, 160)]
                )),
                Operation::Compose(Compose {
                    fill: Fill::opaque(Rgb::BLACK),
                    previous: false
                }),
            ]
        );
    }

    #[test]
    fn subpaths_restart_from_the_origin() {
        let mut b = OpBuilder::new();
        let segments = canonical_stream("M1 1 L2 1 M3 3 L4 3").unwrap();
        b.add_path(&segments, Fill::opaque(Rgb::BLACK)).unwrap();
        let ops = b.operations();
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[2],
            Operation::VectorRun(VectorRun::new(VectorKind::Line, vec![(48, 48), (16, 0)]))
        );
        assert!(matches!(ops[3], Operation::Compose(Compose { previous: true, .. })));
    }

    #[test]
    fn spline_vectors_are_relative_to_segment_start() {
        let mut b = OpBuilder::new();
        let segments = vec![
            Segment::MoveTo(point(1.0, 1.0)),
            Segment::CubicTo(point(2.0, 1.0), point(3.0, 2.0), point(3.0, 3.0)),
        ];
        b.add_path(&segments, Fill::opaque(Rgb::WHITE)).unwrap();
        assert_eq!(
            b.operations()[1],
            Operation::VectorRun(VectorRun::new(
                VectorKind::CubicSpline,
                vec![(16, 0), (32, 16), (32, 32)]
            ))
        );
    }

    #[test]
    fn scaling_rounds_half_to_even() {
        assert_eq!(scale(0.03125).unwrap(), 0);
        assert_eq!(scale(0.09375).unwrap(), 2);
        assert_eq!(scale(-0.03125).unwrap(), 0);
        assert!(scale(f64::INFINITY).is_err());
    }

    #[test]
    fn choice_resets_previous_fill() {
        let mut b = OpBuilder::new();
        let fill = Fill::opaque(Rgb::new(1, 2, 3));
        b.compose(fill).unwrap();
        b.enter_choice(1);
        b.compose(fill).unwrap();
        assert_eq!(
            b.operations().last(),
            Some(&Operation::Compose(Compose {
                fill,
                previous: false
            }))
        );
        assert_eq!(b.palette().index_of(fill.rgb), Some(0));
    }
}
