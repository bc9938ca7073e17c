//! Error types for the MCP server and the project operations it wraps.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// MCP server errors.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON-RPC protocol error.
    #[error("JSON-RPC error: {code} - {message}")]
    JsonRpc {
        /// Error code.
        code: i32,
        /// Error message.
        message: String,
    },

    /// Tool not found.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Error::JsonRpc { code, .. } => *code,
            Error::ToolNotFound(_) => codes::METHOD_NOT_FOUND,
            Error::InvalidParams(_) => codes::INVALID_PARAMS,
            Error::Serialization(_) => codes::PARSE_ERROR,
            Error::Io(_) => -32002,
            Error::Internal(_) => codes::INTERNAL_ERROR,
        }
    }
}

/// Standard JSON-RPC error codes.
pub mod codes {
    /// Parse error.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Failure of a single project operation.
///
/// The `Display` output is the diagnostic handed back to the orchestrator,
/// so every variant reads as a complete sentence starting with "Error"
/// (markup parse failures are wrapped into an `{"error": ...}` object by
/// the caller instead).
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Root or target path does not exist.
    #[error("Error: Path {} does not exist", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A file could not be read (missing, permissions, not UTF-8).
    #[error("Error reading file {path}: {source}")]
    Read {
        /// Path as requested by the caller.
        path: String,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// A file or one of its parent directories could not be written.
    #[error("Error writing file {path}: {source}")]
    Write {
        /// Path as requested by the caller.
        path: String,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// No build tool marker file in the working directory.
    #[error("Error: No supported build tool (Maven/NPM) detected in the specified directory.")]
    UnsupportedProject,

    /// The build tool process could not be started.
    #[error("Error: Execution of `{command}` failed: {source}")]
    Launch {
        /// Command line that was attempted.
        command: String,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// Content could not be interpreted.
    #[error("Could not parse file: {0}")]
    Parse(String),
}

impl ProjectError {
    /// Short machine-friendly name of the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectError::NotFound { .. } => "not_found",
            ProjectError::Read { .. } | ProjectError::Write { .. } => "io_failure",
            ProjectError::UnsupportedProject => "unsupported_project",
            ProjectError::Launch { .. } => "process_launch_failure",
            ProjectError::Parse(_) => "parse_failure",
        }
    }
}
