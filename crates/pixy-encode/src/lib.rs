#![forbid(unsafe_code)]

//! Pixy encoder: compiles an SVG drawing into a compact binary opcode stream for constrained
//! rendering targets.
//!
//! Coordinates are scaled to sixteenths of a unit and stored as deltas in runs of fixed-width
//! vectors; fills are stored as compose records that pick the shortest color form (a palette of
//! repeated colors, grays, or the previous fill).
//!
//! ```
//! use pixy_encode::{EncodeOptions, encode_svg};
//!
//! let svg = r#"<svg width="100" height="50"><path d="M0,0 L10,0 L10,10 Z"/></svg>"#;
//! let bytes = encode_svg(svg, &EncodeOptions::default()).unwrap();
//! assert_eq!(&bytes[..6], b":Pixy\0");
//! assert_eq!(&bytes[8..13], &[0x3C, 0x06, 0x40, 0x03, 0x20]);
//! ```

pub mod builder;
pub mod convert;
pub mod drawing;
pub mod error;
pub mod fill;
pub mod label;
pub mod ops;
pub mod palette;
pub mod walk;

pub use builder::OpBuilder;
pub use convert::{DoctypePolicy, EncodeOptions, convert_svg, encode_svg};
pub use drawing::{Canvas, Drawing};
pub use error::{Error, Result};
pub use fill::resolve_fill;
pub use label::StructuralLabel;
pub use ops::{Compose, ComposeColor, Fill, Operation, VectorKind, VectorRun, WidthClass};
pub use palette::Palette;
