pub type VizResult<T> = Result<T, VizError>;

#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Unknown resolution label, preset, animation name, or a malformed scene file.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("render error: {0}")]
    Render(String),

    /// Sink write failure or encoder process failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Audio decode failure or a degenerate analysis window.
    #[error("analysis error: {0}")]
    Analysis(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Configuration errors are raised before the frame loop starts.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
