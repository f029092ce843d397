//! Error types for the generation proxy.

/// Error kinds for proxy server operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ServerErrorKind {
    /// Listener could not be bound
    #[display("Failed to bind {}: {}", address, message)]
    Bind {
        /// Requested socket address
        address: String,
        /// Underlying I/O error
        message: String,
    },
    /// Server loop terminated with an error
    #[display("Server failed: {}", _0)]
    Serve(String),
    /// Request body failed validation
    #[display("Request body is incorrect: {}", _0)]
    InvalidRequest(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Server Error: {} at line {} in {}", kind, line, file)]
pub struct ServerError {
    /// The error kind
    pub kind: ServerErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ServerError {
    /// Create a new ServerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
