//! Text and image generation adapters for Panelcraft.
//!
//! Each backend family gets one adapter implementing the
//! [`panelcraft_interface`] generator traits:
//!
//! - **Google AI Studio** (Gemini) - text, JSON and image
//! - **TensorOpera** - image (inline base64)
//! - **Together AI** - image (URL, downloaded by the caller)
//!
//! [`ProviderRegistry`] turns a [`panelcraft_core::ServiceSelection`] into the
//! matching adapter, and [`ProxyClient`] talks to the generation proxy used
//! on the fallback path.
//!
//! # Example
//!
//! ```no_run
//! use panelcraft_core::{ComicConfig, ServiceSelection};
//! use panelcraft_models::ProviderRegistry;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ProviderRegistry::from_config(&ComicConfig::load()?);
//! let selection = ServiceSelection::new("Google AI Studio", "gemini-2.5-flash", "my-key");
//! let generator = registry.text_generator(&selection)?;
//! let text = generator.generate_text("Describe a lighthouse.").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod download;
mod gemini;
mod http;
mod metrics;
mod proxy;
mod registry;
mod tensor_opera;
mod together;

pub use download::{download_base64, into_base64};
pub use gemini::GeminiClient;
pub use metrics::{GenerationMetrics, classify_error};
pub use proxy::ProxyClient;
pub use registry::{ProviderRegistry, ServiceKind};
pub use tensor_opera::TensorOperaClient;
pub use together::TogetherAiClient;
