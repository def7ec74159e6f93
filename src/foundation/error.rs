pub type MediaResult<T> = Result<T, MediaError>;

#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("playback error: {0}")]
    Playback(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MediaError {
    pub fn malformed_encoding(msg: impl Into<String>) -> Self {
        Self::MalformedEncoding(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-label any failure raised while decoding audio as a decode failure.
    pub(crate) fn into_decode(self) -> Self {
        match self {
            Self::Decode(_) => self,
            other => Self::Decode(format!("{other:#}")),
        }
    }

    /// Re-label any failure raised inside the image pipeline as a composition failure.
    ///
    /// Composition errors pass through unchanged; everything else keeps its message, including
    /// the full context chain of wrapped errors.
    pub(crate) fn into_composition(self) -> Self {
        match self {
            Self::Composition(_) => self,
            other => Self::Composition(format!("{other:#}")),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
