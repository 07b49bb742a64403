use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Recovered locally by the word source adapters; never reaches session state.
    #[error("word source unavailable: {0}")]
    WordSourceUnavailable(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}
