//! Story and image generation errors surfaced by the fetchers and orchestrator.

/// Generation failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No credential is available on any path
    #[display("Credential missing for {}", _0)]
    CredentialMissing(String),
    /// Service identifier is not recognized; no fallback is attempted
    #[display("Unsupported provider: {}", _0)]
    UnsupportedProvider(String),
    /// Both the primary and the fallback path failed
    #[display("Generation failed (primary: {}; fallback: {})", primary, fallback)]
    UpstreamGenerationFailure {
        /// Failure of the user-selected service
        primary: String,
        /// Failure of the proxy fallback
        fallback: String,
    },
    /// Provider succeeded but produced no beats
    #[display("Sorry, the AI did not generate any events for the story")]
    EmptyGenerationResult,
    /// Image response could not be turned into a base64 payload
    #[display("Image delivery failed: {}", _0)]
    ImageDeliveryFailure(String),
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::EmptyGenerationResult);
/// assert!(format!("{}", err).contains("did not generate"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
