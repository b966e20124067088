use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid field, match type, or option combination. Fatal: surfaced
    /// to the caller immediately, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed response from the search engine.
    #[error("Engine protocol error: {0}")]
    EngineProtocol(String),

    /// The engine could not be reached. Retry policy belongs to the
    /// transport, not this crate.
    #[error("Engine transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
