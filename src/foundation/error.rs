/// Convenience result type used across fanwall.
pub type FanwallResult<T> = Result<T, FanwallError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Every variant except [`FanwallError::SurfaceUnavailable`] is recovered inside a render pass
/// and turned into fallback drawing; it only reaches callers of the lower-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum FanwallError {
    /// A patch or logo image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// A theme id did not resolve to a usable catalog entry.
    #[error("theme resolution error: {0}")]
    ThemeResolution(String),

    /// A font could not be provided after the configured attempts.
    #[error("font load error: {0}")]
    FontLoad(String),

    /// A kickoff timestamp was missing or malformed.
    #[error("date parse error: {0}")]
    DateParse(String),

    /// No drawing surface could be obtained for the requested dimensions.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Invalid user-provided request or catalog data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FanwallError {
    /// Build a [`FanwallError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`FanwallError::ThemeResolution`] value.
    pub fn theme_resolution(msg: impl Into<String>) -> Self {
        Self::ThemeResolution(msg.into())
    }

    /// Build a [`FanwallError::FontLoad`] value.
    pub fn font_load(msg: impl Into<String>) -> Self {
        Self::FontLoad(msg.into())
    }

    /// Build a [`FanwallError::DateParse`] value.
    pub fn date_parse(msg: impl Into<String>) -> Self {
        Self::DateParse(msg.into())
    }

    /// Build a [`FanwallError::SurfaceUnavailable`] value.
    pub fn surface_unavailable(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }

    /// Build a [`FanwallError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FanwallError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error aborts a whole render pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
