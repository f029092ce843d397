//! Layered configuration for the comic generator.
//!
//! Configuration is read in order, later sources overriding earlier ones:
//! - Bundled defaults (include_str! from panelcraft.toml)
//! - `~/.config/panelcraft/panelcraft.toml`
//! - `./panelcraft.toml`
//! - `PANELCRAFT__<SECTION>__<KEY>` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use panelcraft_error::{ConfigError, PanelcraftError, PanelcraftResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../panelcraft.toml");

/// Look-ahead thresholds for the prefetcher.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct HorizonConfig {
    /// Fetch more story once this many beats or fewer remain past the cursor
    #[serde(default = "default_text_horizon")]
    #[builder(default = "default_text_horizon()")]
    text_horizon: usize,

    /// Number of beats from the cursor whose images are prefetched
    #[serde(default = "default_image_horizon")]
    #[builder(default = "default_image_horizon()")]
    image_horizon: usize,
}

fn default_text_horizon() -> usize {
    5
}

fn default_image_horizon() -> usize {
    3
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            text_horizon: default_text_horizon(),
            image_horizon: default_image_horizon(),
        }
    }
}

/// Where the fetchers go when the user-selected service fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct FallbackConfig {
    /// Base URL of the generation proxy
    #[serde(default = "default_proxy_url")]
    proxy_url: String,
    /// Low-cost text service used on the fallback path
    #[serde(default = "default_text_service")]
    text_service: String,
    /// Low-cost text model used on the fallback path
    #[serde(default = "default_text_model")]
    text_model: String,
    /// Image service used on the fallback path
    #[serde(default = "default_image_service")]
    image_service: String,
    /// Image model used on the fallback path
    #[serde(default = "default_image_model")]
    image_model: String,
    /// Shared secret that tells the proxy to use its pooled credentials
    #[serde(default)]
    pool_token: String,
}

fn default_proxy_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_text_service() -> String {
    "Google AI Studio".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_service() -> String {
    "TensorOpera".to_string()
}

fn default_image_model() -> String {
    "Flux/Dev".to_string()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            text_service: default_text_service(),
            text_model: default_text_model(),
            image_service: default_image_service(),
            image_model: default_image_model(),
            pool_token: String::new(),
        }
    }
}

/// Upstream provider base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct EndpointConfig {
    /// Google AI Studio (Gemini) REST base
    #[serde(default = "default_gemini")]
    gemini: String,
    /// TensorOpera inference base
    #[serde(default = "default_tensor_opera")]
    tensor_opera: String,
    /// Together AI base
    #[serde(default = "default_together_ai")]
    together_ai: String,
}

fn default_gemini() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_tensor_opera() -> String {
    "https://open.tensoropera.ai".to_string()
}

fn default_together_ai() -> String {
    "https://api.together.xyz".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            tensor_opera: default_tensor_opera(),
            together_ai: default_together_ai(),
        }
    }
}

/// Diffusion parameters sent to image backends that accept them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct ImageConfig {
    /// Output width in pixels
    #[serde(default = "default_dimension")]
    width: u32,
    /// Output height in pixels
    #[serde(default = "default_dimension")]
    height: u32,
    /// Inference steps
    #[serde(default = "default_steps")]
    steps: u32,
    /// Classifier-free guidance scale
    #[serde(default = "default_guidance")]
    guidance: f32,
}

fn default_dimension() -> u32 {
    512
}

fn default_steps() -> u32 {
    15
}

fn default_guidance() -> f32 {
    2.0
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_dimension(),
            height: default_dimension(),
            steps: default_steps(),
            guidance: default_guidance(),
        }
    }
}

/// Generation proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_setters::Setters)]
#[setters(prefix = "with_", into)]
pub struct ProxyConfig {
    /// Socket address the proxy listens on
    #[serde(default = "default_bind")]
    bind: String,
    /// Text model retried with the pooled credential after a failure
    #[serde(default = "default_text_model")]
    fallback_text_model: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            fallback_text_model: default_text_model(),
        }
    }
}

/// Top-level Panelcraft configuration.
///
/// # Examples
///
/// ```
/// use panelcraft_core::ComicConfig;
///
/// let config = ComicConfig::default();
/// assert_eq!(*config.horizons().text_horizon(), 5);
/// assert_eq!(*config.horizons().image_horizon(), 3);
/// ```
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct ComicConfig {
    /// Prefetch thresholds
    #[serde(default)]
    horizons: HorizonConfig,
    /// Proxy fallback selection
    #[serde(default)]
    fallback: FallbackConfig,
    /// Provider base URLs
    #[serde(default)]
    endpoints: EndpointConfig,
    /// Image generation parameters
    #[serde(default)]
    image: ImageConfig,
    /// Proxy server settings
    #[serde(default)]
    proxy: ProxyConfig,
}

impl ComicConfig {
    /// Load configuration from a specific file path, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PanelcraftResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use panelcraft_core::ComicConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ComicConfig::load()?;
    /// println!("proxy at {}", config.fallback().proxy_url());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> PanelcraftResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("panelcraft/panelcraft.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("panelcraft").required(false))
            .add_source(Environment::with_prefix("PANELCRAFT").separator("__"));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> PanelcraftResult<Self> {
        builder
            .build()
            .map_err(|e| {
                PanelcraftError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PanelcraftError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
