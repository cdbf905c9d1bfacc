use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptOutError {
    #[error("unrecognized host platform")]
    PlatformUnknown,

    #[error("executable not found on PATH: {0}")]
    ExecutableNotFound(String),

    #[error("command '{program}' failed: {reason}")]
    CommandExecutionFailed { program: String, reason: String },

    #[error("invalid catalog entry: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OptOutError>;
