use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur during target discovery
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("CMake executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    ToolTimeout { command: String, timeout: Duration },

    #[error("Watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Invalid error pattern: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Invalid config file: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("No target named `{name}` in {build_dir}")]
    TargetNotFound { name: String, build_dir: PathBuf },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, Error>;
