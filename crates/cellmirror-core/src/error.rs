pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid value for style `{key}`: {value:?}")]
    InvalidStyleValue { key: String, value: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("Invalid wire object ({kind}): {message}")]
    InvalidWire { kind: &'static str, message: String },

    #[error("Unknown graph event: {name}")]
    UnknownEvent { name: String },
}

impl Error {
    pub(crate) fn invalid_style(key: &str, value: &str) -> Self {
        Self::InvalidStyleValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
