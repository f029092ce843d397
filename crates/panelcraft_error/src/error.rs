//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, GenerationErrorKind, JsonError, ProviderError,
    ProviderErrorKind, ServerError,
};

/// Every error condition the Panelcraft crates can produce.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{PanelcraftError, PanelcraftErrorKind, ProviderError, ProviderErrorKind};
///
/// let err: PanelcraftError =
///     ProviderError::new(ProviderErrorKind::Request("connection refused".into())).into();
/// assert!(matches!(err.kind(), PanelcraftErrorKind::Provider(_)));
/// assert!(format!("{}", err).contains("connection refused"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PanelcraftErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Generation adapter error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Story or image generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Generation proxy error
    #[from(ServerError)]
    Server(ServerError),
}

/// Panelcraft error with kind discrimination.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{ConfigError, PanelcraftResult};
///
/// fn might_fail() -> PanelcraftResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Panelcraft Error: {}", _0)]
pub struct PanelcraftError(Box<PanelcraftErrorKind>);

impl PanelcraftError {
    /// Create a new error from a kind.
    pub fn new(kind: PanelcraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PanelcraftErrorKind {
        &self.0
    }

    /// Generation kind, if this is a generation error.
    pub fn generation_kind(&self) -> Option<&GenerationErrorKind> {
        match self.kind() {
            PanelcraftErrorKind::Generation(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// Provider kind, if this is an adapter error.
    pub fn provider_kind(&self) -> Option<&ProviderErrorKind> {
        match self.kind() {
            PanelcraftErrorKind::Provider(err) => Some(&err.kind),
            _ => None,
        }
    }

    /// True when the failure names a service no adapter exists for.
    ///
    /// Such failures skip the fallback path.
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(
            self.generation_kind(),
            Some(GenerationErrorKind::UnsupportedProvider(_))
        ) || matches!(
            self.provider_kind(),
            Some(ProviderErrorKind::UnsupportedService(_))
        )
    }
}

// Generic From implementation for any type that converts to PanelcraftErrorKind
impl<T> From<T> for PanelcraftError
where
    T: Into<PanelcraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Panelcraft operations.
///
/// # Examples
///
/// ```
/// use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
///
/// fn fetch_image() -> PanelcraftResult<String> {
///     Err(GenerationError::new(GenerationErrorKind::ImageDeliveryFailure(
///         "404 Not Found".into(),
///     )))?
/// }
/// ```
pub type PanelcraftResult<T> = std::result::Result<T, PanelcraftError>;
