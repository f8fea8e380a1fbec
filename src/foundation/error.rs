/// Convenience result type used across image-wire.
pub type WireResult<T> = Result<T, WireError>;

const MAX_DATA_URI_DISPLAY: usize = 64;

/// Top-level error taxonomy returned by the compositor and its helpers.
#[derive(thiserror::Error, Debug)]
pub enum WireError {
    /// Invalid caller-provided input (empty source list, bad options, oversized canvas).
    #[error("validation error: {0}")]
    Validation(String),

    /// A source could not be fetched or decoded.
    #[error("load error: {source_uri}: {reason}")]
    Load {
        /// The URI (or object URL) that failed.
        source_uri: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// The surface could not be encoded with the requested format/quality.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WireError {
    /// Build a [`WireError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WireError::Load`] value. Long `data:` URIs are shortened for display.
    pub fn load(source_uri: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let mut source_uri = source_uri.into();
        if source_uri.starts_with("data:") && source_uri.len() > MAX_DATA_URI_DISPLAY {
            let mut cut = MAX_DATA_URI_DISPLAY;
            while !source_uri.is_char_boundary(cut) {
                cut -= 1;
            }
            source_uri.truncate(cut);
            source_uri.push_str("...");
        }
        Self::Load {
            source_uri,
            reason: reason.to_string(),
        }
    }

    /// Build a [`WireError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`WireError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for [`WireError::Load`].
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
