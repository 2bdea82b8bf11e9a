#![forbid(unsafe_code)]

//! SVG path coordinate model and presentation-style cascade (headless).
//!
//! - [`path`]: path grammar, pen tracking, absolute/relative conversion, curve reflection,
//!   transforms and the canonical `M L Q C Z` stream consumed by encoders
//! - [`geom`]: affine [`Matrix`] on top of `euclid`
//! - [`style`]: the parent-linked property cascade
//! - [`color`], [`opacity`], [`transform`], [`points`]: attribute value parsers

pub mod color;
pub mod error;
pub mod geom;
pub mod number;
pub mod opacity;
pub mod path;
pub mod points;
pub mod style;
pub mod transform;

pub use color::{Paint, Rgb, parse_color, parse_paint};
pub use error::{Error, Result};
pub use geom::{Matrix, Point, point};
pub use opacity::parse_opacity;
pub use path::{
    CommandKind, Path, PathCommand, PathFormatOptions, Segment, canonical_stream, format_path,
};
pub use style::{PropertySource, Style, StyleStack};
pub use transform::parse_transform;
