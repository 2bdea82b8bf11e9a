use crate::ops::{Operation, SCALE};
use crate::palette::Palette;
use crate::{Error, Result};
use pixy_core::Rgb;

/// Canvas size in sixteenths of a user unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u16,
    pub height: u16,
}

impl Canvas {
    /// Scales a size given in user units.
    pub fn from_size(width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            width: scale_dimension("canvas width", width)?,
            height: scale_dimension("canvas height", height)?,
        })
    }
}

fn scale_dimension(what: &'static str, v: f64) -> Result<u16> {
    let scaled = (v * SCALE).round_ties_even();
    if !(0.0..=f64::from(u16::MAX)).contains(&scaled) {
        return Err(Error::overflow(what, scaled as i64));
    }
    Ok(scaled as u16)
}

/// The result of one conversion, ready to serialize.
#[derive(Debug)]
pub struct Drawing {
    canvas: Canvas,
    palette: Palette,
    operations: Vec<Operation>,
}

impl Drawing {
    pub fn new(canvas: Canvas, palette: Palette, operations: Vec<Operation>) -> Self {
        Self {
            canvas,
            palette,
            operations,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Every record in stream order: header, canvas, palette (when non-empty), operations.
    pub fn records(&self) -> Vec<Operation> {
        let mut out = Vec::with_capacity(self.operations.len() + 3);
        out.push(Operation::Header);
        out.push(Operation::Canvas {
            width: self.canvas.width,
            height: self.canvas.height,
        });
        if !self.palette.is_empty() {
            out.push(Operation::Palette {
                colors: self.palette.colors().collect::<Vec<Rgb>>(),
            });
        }
        out.extend(self.operations.iter().cloned());
        out
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for record in self.records() {
            record.encode(&self.palette, &mut out)?;
        }
        Ok(out)
    }
}
