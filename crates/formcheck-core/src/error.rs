//! Error types for the formcheck system.
//!
//! Missing or low-confidence geometry is not an error: detectors report it
//! through their feedback string. These variants cover construction and
//! boundary failures only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown exercise: {0:?}")]
    UnknownExercise(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
