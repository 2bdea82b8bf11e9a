//! Pixy operations and their byte encodings.

use crate::palette::{PALETTE_CAPACITY, Palette};
use crate::{Error, Result};
use pixy_core::Rgb;
use serde::Serialize;

/// Coordinates are stored in sixteenths of a user unit.
pub const SCALE: f64 = 16.0;

/// Most segments (or line points) a single vector run can hold.
pub const MAX_RUN: usize = 16;

const MAGIC: &[u8] = b":Pixy\0";
const VERSION: [u8; 2] = [0, 1];

const OP_COMPOSE: u8 = 0b0010_0000;
const RASTERIZE: u8 = 0b0000_1000;
const OP_DETAIL: u8 = 0b0011_1000;
const OP_END: u8 = 0b0011_1001;
const OP_CANVAS: u8 = 0b0011_1100;
const OP_PALETTE: u8 = 0b0011_1101;

/// Resolved paint of a filled region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fill {
    pub alpha: u8,
    pub rgb: Rgb,
}

impl Fill {
    pub const fn opaque(rgb: Rgb) -> Self {
        Self { alpha: 255, rgb }
    }
}

/// How a compose names its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeColor {
    Black,
    White,
    Previous,
    Gray(u8),
    Palette(u8),
    AlphaPalette { alpha: u8, index: u8 },
    Rgb8(Rgb),
    Argb8(Fill),
}

impl ComposeColor {
    pub fn subcode(&self) -> u8 {
        match self {
            Self::Black => 0b000,
            Self::White => 0b001,
            Self::Previous => 0b010,
            Self::Gray(_) => 0b011,
            Self::Palette(_) => 0b100,
            Self::AlphaPalette { .. } => 0b101,
            Self::Rgb8(_) => 0b110,
            Self::Argb8(_) => 0b111,
        }
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.push(OP_COMPOSE | RASTERIZE | self.subcode());
        match *self {
            Self::Black | Self::White | Self::Previous => {}
            Self::Gray(v) => out.push(v),
            Self::Palette(index) => out.push(index),
            Self::AlphaPalette { alpha, index } => out.extend([alpha, index]),
            Self::Rgb8(rgb) => out.extend(rgb.to_array()),
            Self::Argb8(fill) => {
                out.push(fill.alpha);
                out.extend(fill.rgb.to_array());
            }
        }
    }
}

/// Fills the region traced since the previous compose.
///
/// `previous` is decided when the compose is built; the remaining color choice depends on the
/// final palette and is made by [`Compose::color`] at serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Compose {
    pub fill: Fill,
    pub previous: bool,
}

impl Compose {
    pub fn color(&self, palette: &Palette) -> ComposeColor {
        if self.previous {
            return ComposeColor::Previous;
        }
        let Fill { alpha, rgb } = self.fill;
        let index = palette.index_of(rgb);
        if alpha == u8::MAX {
            match (rgb, index) {
                (Rgb::BLACK, _) => ComposeColor::Black,
                (Rgb::WHITE, _) => ComposeColor::White,
                _ if rgb.is_gray() => ComposeColor::Gray(rgb.r),
                (_, Some(index)) => ComposeColor::Palette(index),
                (_, None) => ComposeColor::Rgb8(rgb),
            }
        } else {
            match index {
                Some(index) => ComposeColor::AlphaPalette { alpha, index },
                None => ComposeColor::Argb8(self.fill),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    Line,
    QuadSpline,
    CubicSpline,
}

impl VectorKind {
    /// Vectors making up one segment of this kind.
    pub fn points(self) -> usize {
        match self {
            Self::Line => 1,
            Self::QuadSpline => 2,
            Self::CubicSpline => 3,
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::Line => 0b0000_0000,
            Self::QuadSpline => 0b0001_0000,
            Self::CubicSpline => 0b0010_0000,
        }
    }
}

/// Fixed width used for every component of a vector run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WidthClass {
    S8,
    S12,
    S16,
}

impl WidthClass {
    /// Narrowest class holding every component of `vectors`.
    pub fn of(vectors: &[(i32, i32)]) -> Result<Self> {
        let (min, max) = vectors
            .iter()
            .flat_map(|&(x, y)| [x, y])
            .fold((0, 0), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if (-128..=127).contains(&min) && (-128..=127).contains(&max) {
            Ok(Self::S8)
        } else if (-2048..=2047).contains(&min) && (-2048..=2047).contains(&max) {
            Ok(Self::S12)
        } else if min >= i16::MIN as i32 && max <= i16::MAX as i32 {
            Ok(Self::S16)
        } else {
            let worst = if min < i16::MIN as i32 { min } else { max };
            Err(Error::overflow("vector component", worst))
        }
    }

    fn bits(self) -> u8 {
        match self {
            Self::S8 => 0b0100_0000,
            Self::S12 => 0b1000_0000,
            Self::S16 => 0b1100_0000,
        }
    }

    // Components are range-checked by `WidthClass::of`; the casts keep the low bits.
    fn encode(self, (x, y): (i32, i32), out: &mut Vec<u8>) {
        match self {
            Self::S8 => out.extend([x as u8, y as u8]),
            Self::S12 => out.extend([
                (x >> 4) as u8,
                ((x << 4) & 0xF0) as u8 | ((y >> 8) & 0x0F) as u8,
                y as u8,
            ]),
            Self::S16 => {
                out.extend((x as i16).to_be_bytes());
                out.extend((y as i16).to_be_bytes());
            }
        }
    }
}

/// Consecutive segments of one kind, stored as integer deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VectorRun {
    pub kind: VectorKind,
    pub vectors: Vec<(i32, i32)>,
}

impl VectorRun {
    pub fn new(kind: VectorKind, vectors: Vec<(i32, i32)>) -> Self {
        Self { kind, vectors }
    }

    /// Segments in the run (points, for lines).
    pub fn count(&self) -> usize {
        self.vectors.len() / self.kind.points()
    }

    pub fn width_class(&self) -> Result<WidthClass> {
        WidthClass::of(&self.vectors)
    }

    pub fn opcode(&self) -> Result<u8> {
        let count = self.count();
        if count == 0 || count > MAX_RUN || self.vectors.len() % self.kind.points() != 0 {
            return Err(Error::overflow("vector run length", self.vectors.len() as i64));
        }
        Ok(self.width_class()?.bits() | self.kind.bits() | (count - 1) as u8)
    }

    fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        let width = self.width_class()?;
        out.push(self.opcode()?);
        for &v in &self.vectors {
            width.encode(v, out);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Header,
    Canvas { width: u16, height: u16 },
    Palette { colors: Vec<Rgb> },
    Compose(Compose),
    VectorRun(VectorRun),
    Group { id: u8 },
    Detail { level: u32 },
    End,
}

impl Operation {
    /// Appends the record's bytes to `out`. Compose colors are resolved against `palette`.
    pub fn encode(&self, palette: &Palette, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Header => {
                out.extend(MAGIC);
                out.extend(VERSION);
            }
            Self::Canvas { width, height } => {
                out.push(OP_CANVAS);
                out.extend(width.to_be_bytes());
                out.extend(height.to_be_bytes());
            }
            Self::Palette { colors } => {
                if colors.is_empty() || colors.len() > PALETTE_CAPACITY {
                    return Err(Error::overflow("palette size", colors.len() as i64));
                }
                out.push(OP_PALETTE);
                // 256 wraps to 0
                out.push(colors.len() as u8);
                for rgb in colors {
                    out.extend(rgb.to_array());
                }
            }
            Self::Compose(compose) => compose.color(palette).encode(out),
            Self::VectorRun(run) => run.encode(out)?,
            Self::Group { id } => {
                if *id > 0x0F {
                    return Err(Error::overflow("group id", *id));
                }
                out.push(*id);
            }
            Self::Detail { .. } => out.push(OP_DETAIL),
            Self::End => out.push(OP_END),
        }
        Ok(())
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Self::Group { .. } | Self::Detail { .. })
    }
}
