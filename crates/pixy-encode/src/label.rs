use crate::{Error, Result};

const DETAIL_PREFIX: &str = "detail_";
const CHOICE_PREFIX: &str = "choice_";

/// Highest group id a choice label may name.
pub const MAX_GROUP: u8 = 15;

/// Structural directive carried by a container label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralLabel {
    /// `detail_<N>`
    Detail(u32),
    /// `choice_<G>_<V>`
    Choice { group: u8, value: u32 },
}

impl StructuralLabel {
    /// Parses a container label. Labels without a structural prefix yield `None`.
    pub fn parse(label: &str) -> Result<Option<Self>> {
        let unknown = || Error::UnknownStructuralLabel {
            label: label.to_string(),
        };
        if let Some(level) = label.strip_prefix(DETAIL_PREFIX) {
            let level = level.parse::<u32>().map_err(|_| unknown())?;
            return Ok(Some(Self::Detail(level)));
        }
        if let Some(rest) = label.strip_prefix(CHOICE_PREFIX) {
            let (group, value) = rest.split_once('_').ok_or_else(unknown)?;
            let group = group
                .parse::<u8>()
                .ok()
                .filter(|g| *g <= MAX_GROUP)
                .ok_or_else(unknown)?;
            let value = value.parse::<u32>().map_err(|_| unknown())?;
            return Ok(Some(Self::Choice { group, value }));
        }
        Ok(None)
    }
}
