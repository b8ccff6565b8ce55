use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine home directory")]
    HomeDirNotFound,

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not supported on this system: {0}")]
    Unsupported(String),

    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("{action}: {failed} of {total} operations failed")]
    PartialFailure {
        action: String,
        failed: usize,
        total: usize,
    },
}

impl OptimizerError {
    /// Map an IO error on `path`, keeping permission problems distinguishable.
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            OptimizerError::PermissionDenied(path.display().to_string())
        } else {
            OptimizerError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
