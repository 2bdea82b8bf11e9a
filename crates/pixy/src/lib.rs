#![forbid(unsafe_code)]

//! `pixy` normalizes SVG path geometry and compiles SVG drawings into the Pixy binary format.
//!
//! # Features
//!
//! - `encode` (default): the SVG to Pixy encoder (`pixy::encode`)

pub use pixy_core::*;

#[cfg(feature = "encode")]
pub mod encode {
    pub use pixy_encode::{
        Canvas, Compose, ComposeColor, DoctypePolicy, Drawing, EncodeOptions, Fill, OpBuilder,
        Operation, Palette, StructuralLabel, VectorKind, VectorRun, WidthClass, resolve_fill,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum PixyError {
        #[error(transparent)]
        Path(#[from] pixy_core::Error),
        #[error(transparent)]
        Encode(#[from] pixy_encode::Error),
    }

    pub type Result<T> = std::result::Result<T, PixyError>;

    /// Converts SVG text into a [`Drawing`].
    pub fn convert_svg(text: &str, options: &EncodeOptions) -> Result<Drawing> {
        Ok(pixy_encode::convert_svg(text, options)?)
    }

    /// Converts SVG text into Pixy bytes.
    pub fn encode_svg(text: &str, options: &EncodeOptions) -> Result<Vec<u8>> {
        Ok(pixy_encode::encode_svg(text, options)?)
    }

    /// Rewrites path geometry, then encodes it on its own as a single filled path.
    ///
    /// Useful for checking how one path's geometry lands in the opcode stream.
    pub fn encode_path(geometry: &str, fill: Fill) -> Result<Vec<Operation>> {
        let segments = pixy_core::canonical_stream(geometry)?;
        let mut builder = OpBuilder::new();
        builder.add_path(&segments, fill)?;
        Ok(builder.operations().to_vec())
    }
}
