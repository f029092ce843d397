//! Generation proxy for Panelcraft.
//!
//! Clients without their own provider keys (or whose keys failed) send story
//! and image requests here. The proxy substitutes pooled credentials for an
//! empty key or the pool token, runs the same story pipeline the client would,
//! and answers images as `{image}` or `{url}`.
//!
//! # Example
//!
//! ```no_run
//! use panelcraft_core::ComicConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ComicConfig::load()?;
//! panelcraft_server::run(&config).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod credentials;
mod retry;
mod server;
mod state;

pub use api::{ApiError, create_router};
pub use credentials::PooledCredentials;
pub use retry::ModelFallbackGenerator;
pub use server::{bind, run, serve};
pub use state::ProxyState;
