//! Color palette promotion.
//!
//! A color is promoted the second time it is observed; the first sighting only records it.
//! Indices are assigned in promotion order and never change.

use crate::{Error, Result};
use indexmap::IndexSet;
use pixy_core::Rgb;
use rustc_hash::FxHashSet;

/// Largest number of entries a palette record can describe. The record's count byte holds
/// `len % 256`, so a count of 0 stands for 256 (an empty palette is never written).
pub const PALETTE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Default)]
pub struct Palette {
    entries: IndexSet<Rgb>,
    seen: FxHashSet<Rgb>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one use of `rgb`, promoting it on its second use.
    ///
    /// Returns `true` when this call promoted the color.
    pub fn observe(&mut self, rgb: Rgb) -> Result<bool> {
        if self.entries.contains(&rgb) || self.seen.insert(rgb) {
            return Ok(false);
        }
        if self.entries.len() >= PALETTE_CAPACITY {
            return Err(Error::overflow("palette size", self.entries.len() as i64 + 1));
        }
        self.entries.insert(rgb);
        tracing::debug!(
            r = rgb.r,
            g = rgb.g,
            b = rgb.b,
            index = self.entries.len() - 1,
            "palette promotion"
        );
        Ok(true)
    }

    pub fn index_of(&self, rgb: Rgb) -> Option<u8> {
        self.entries
            .get_index_of(&rgb)
            .and_then(|i| u8::try_from(i).ok())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.entries.iter().copied()
    }
}
