//! Generation adapter errors.

/// Failure conditions reported by a single provider adapter call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// No credential was supplied for a provider that requires one
    #[display("No credential supplied for {}", provider)]
    MissingCredential {
        /// Provider display name
        provider: String,
    },
    /// The service identifier does not name a known backend
    #[display("Unsupported service: {}", _0)]
    UnsupportedService(String),
    /// Request could not be sent or the body could not be read
    #[display("Request failed: {}", _0)]
    Request(String),
    /// Provider answered with a non-success status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message extracted from the body
        message: String,
    },
    /// Provider answered successfully but the body was not usable
    #[display("Unexpected response shape: {}", _0)]
    ResponseShape(String),
    /// Downloading a generated asset from its URL failed
    #[display("Download failed: {}", _0)]
    Download(String),
}

impl ProviderErrorKind {
    /// Short label used for metrics and log fields.
    pub fn category(&self) -> &'static str {
        match self {
            ProviderErrorKind::MissingCredential { .. } => "credential",
            ProviderErrorKind::UnsupportedService(_) => "unsupported",
            ProviderErrorKind::Request(_) | ProviderErrorKind::Download(_) => "network",
            ProviderErrorKind::HttpError { status_code, .. } => match *status_code {
                401 | 403 => "auth",
                429 => "rate_limit",
                _ => "upstream",
            },
            ProviderErrorKind::ResponseShape(_) => "response",
        }
    }
}

/// Provider adapter error with source location tracking.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::HttpError {
///     status_code: 429,
///     message: "quota exhausted".to_string(),
/// });
/// assert_eq!(err.kind.category(), "rate_limit");
/// assert!(format!("{}", err).contains("quota exhausted"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
