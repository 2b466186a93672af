use thiserror::Error;

/// Fatal engine conditions that callers may want to match on.
///
/// Everything else travels as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("keyboard input not available")]
    KeyboardUnavailable,

    #[error("no scene is active")]
    NoActiveScene,
}
