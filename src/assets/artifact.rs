//! Text-safe artifact encoding.
//!
//! Generated media arrives as standard-alphabet base64, either bare or wrapped in a
//! `data:<mime>;base64,` URI. Decoding tolerates ASCII whitespace (line-wrapped payloads) but
//! requires canonical padding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::foundation::error::{MediaError, MediaResult};

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encode raw bytes into their text-safe form. Total for every byte sequence.
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode text produced by [`encode`] back into raw bytes.
pub fn decode(text: &str) -> MediaResult<Vec<u8>> {
    let decoded = if text.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        BASE64.decode(compact.as_bytes())
    } else {
        BASE64.decode(text.as_bytes())
    };
    decoded.map_err(|e| MediaError::malformed_encoding(e.to_string()))
}

/// An encoded (text-safe) image or audio payload.
///
/// Immutable once produced; cloning is the only way to share it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EncodedArtifact(String);

impl EncodedArtifact {
    /// Wrap already-encoded text without validating it.
    ///
    /// Validation happens lazily in [`EncodedArtifact::to_bytes`].
    pub fn from_encoded(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(encode(bytes))
    }

    /// Strip a `data:<mime>;base64,` wrapper and keep the payload.
    ///
    /// Returns the declared MIME type alongside the artifact.
    pub fn from_data_uri(uri: &str) -> MediaResult<(String, Self)> {
        let rest = uri
            .strip_prefix(DATA_URI_PREFIX)
            .ok_or_else(|| MediaError::malformed_encoding("data URI must start with 'data:'"))?;
        let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or_else(|| {
            MediaError::malformed_encoding("data URI must declare ';base64,' encoding")
        })?;
        Ok((mime.to_owned(), Self(payload.to_owned())))
    }

    /// Wrap the payload as a `data:` URI for presentation layers.
    pub fn to_data_uri(&self, mime: &str) -> String {
        format!("{DATA_URI_PREFIX}{mime}{BASE64_MARKER}{}", self.0)
    }

    /// Borrow the encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the encoded text in bytes.
    pub fn encoded_len(&self) -> usize {
        self.0.len()
    }

    /// Decode into raw bytes.
    pub fn to_bytes(&self) -> MediaResult<Vec<u8>> {
        decode(&self.0)
    }
}

impl std::fmt::Display for EncodedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/artifact.rs"]
mod tests;
