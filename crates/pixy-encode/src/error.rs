pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] pixy_core::Error),

    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid document type: {doctype}")]
    InvalidDocumentType { doctype: String },

    #[error("Unknown structural label: {label}")]
    UnknownStructuralLabel { label: String },

    #[error("Value out of encodable range ({what}): {value}")]
    EncodingRangeOverflow { what: &'static str, value: i64 },

    #[error("<{element}> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
}

impl Error {
    pub(crate) fn overflow(what: &'static str, value: impl Into<i64>) -> Self {
        Self::EncodingRangeOverflow {
            what,
            value: value.into(),
        }
    }
}
