use agf_core::SceneId;
use agf_dsl::ParseError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving adventures and sessions.
///
/// Everything here is recoverable by the caller — reject the upload, ask for
/// another index, report the miss — except [`EngineError::MissingScene`],
/// which can only arise from a parser defect.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No catalog entry under that name.
    #[error("adventure not found: \"{0}\"")]
    UnknownAdventure(String),

    /// A session is already running under the key; it must finish or quit
    /// before another can start.
    #[error("a session is already running for \"{0}\"")]
    AlreadyRunning(String),

    /// No session under the key.
    #[error("no session for \"{0}\"")]
    NoSuchSession(String),

    /// The submitted choice index is outside the current scene's choices.
    /// The session is left exactly as it was.
    #[error("choice {index} is out of range ({available} available)")]
    ChoiceOutOfRange {
        /// The rejected index.
        index: usize,
        /// How many choices the current scene actually offers.
        available: usize,
    },

    /// A validated adventure referenced a scene that does not exist. Never
    /// reachable if the parser's validation is correct.
    #[error("scene \"{0}\" missing from validated adventure")]
    MissingScene(SceneId),

    /// An uploaded adventure failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
