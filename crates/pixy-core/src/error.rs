pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Invalid path syntax: {command}")]
    InvalidPathSyntax { command: String },

    #[error("Unsupported path feature: {feature}")]
    UnsupportedPathFeature { feature: String },

    #[error("Invalid transform: {value}")]
    InvalidTransform { value: String },

    #[error("Invalid color: {value}")]
    InvalidColor { value: String },

    #[error("Invalid opacity: {value}")]
    InvalidOpacity { value: String },

    #[error("Invalid number: {value}")]
    InvalidNumber { value: String },
}

impl Error {
    pub(crate) fn path_syntax(command: impl Into<String>) -> Self {
        Self::InvalidPathSyntax {
            command: command.into(),
        }
    }
}
