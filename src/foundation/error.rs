/// Convenience result type used across brandframe.
pub type BrandframeResult<T> = Result<T, BrandframeError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Conditions the compositor tolerates (missing overlay, missing render target, caption overflow)
/// are not represented here; they are logged and reported through typed summaries instead.
#[derive(thiserror::Error, Debug)]
pub enum BrandframeError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while reading or decoding image and font assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while composing a format surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding surfaces or building the export archive.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BrandframeError {
    /// Build a [`BrandframeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BrandframeError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`BrandframeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`BrandframeError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`BrandframeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
