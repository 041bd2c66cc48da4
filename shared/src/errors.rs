//! Shared error types for the minicluster workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("No command line argument '{flag}' found")]
    MissingFlag { flag: String },

    #[error("Invalid value for '{flag}': {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("Unknown daemon kind: {input}")]
    UnknownDaemonKind { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
