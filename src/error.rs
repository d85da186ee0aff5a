use thiserror::Error;

/// Failures that can reach the caller.
///
/// Out-of-range parameters are clamped and late teardowns are ignored, so the
/// only fatal condition is a render context that cannot be opened.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),

    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

impl EngineError {
    /// Every variant means the engine is not playing; kept for display code
    /// that only needs a single terminal status.
    pub fn status_line(&self) -> &'static str {
        "audio engine unavailable"
    }
}
