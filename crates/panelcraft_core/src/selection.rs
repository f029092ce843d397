//! Provider selections supplied by the presentation layer on every advance.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Which backend, model and credential to use for one resource.
///
/// # Examples
///
/// ```
/// use panelcraft_core::ServiceSelection;
///
/// let text = ServiceSelection::new("Google AI Studio", "gemini-2.5-flash", "");
/// assert!(!text.has_credential());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ServiceSelection {
    /// Service identifier (e.g. "Google AI Studio")
    service: String,
    /// Model identifier
    model: String,
    /// User-supplied credential, possibly empty
    credential: String,
}

impl ServiceSelection {
    /// Create a selection.
    pub fn new(
        service: impl Into<String>,
        model: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            model: model.into(),
            credential: credential.into(),
        }
    }

    /// True when a non-blank credential was supplied.
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }
}

// Credentials never reach log output.
impl std::fmt::Debug for ServiceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSelection")
            .field("service", &self.service)
            .field("model", &self.model)
            .field("credential", &if self.has_credential() { "<set>" } else { "<empty>" })
            .finish()
    }
}

/// Everything `advance` needs to know about the reader's provider choices.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GenerationSettings {
    /// Text generation selection
    text: ServiceSelection,
    /// Image generation selection
    image: ServiceSelection,
    /// Style prefix prepended to every depiction
    image_style: String,
}

impl GenerationSettings {
    /// Create generation settings.
    pub fn new(
        text: ServiceSelection,
        image: ServiceSelection,
        image_style: impl Into<String>,
    ) -> Self {
        Self {
            text,
            image,
            image_style: image_style.into(),
        }
    }
}
