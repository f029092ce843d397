//! Listener setup and the serve loop.

use crate::{ProxyState, create_router};
use panelcraft_core::ComicConfig;
use panelcraft_error::{PanelcraftResult, ServerError, ServerErrorKind};
use tokio::net::TcpListener;
use tracing::{info, instrument};

/// Bind the proxy listener.
pub async fn bind(address: &str) -> PanelcraftResult<TcpListener> {
    TcpListener::bind(address).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            address: address.to_string(),
            message: e.to_string(),
        })
        .into()
    })
}

/// Serve the proxy routes on an already bound listener until the server stops.
pub async fn serve(listener: TcpListener, state: ProxyState) -> PanelcraftResult<()> {
    if let Ok(address) = listener.local_addr() {
        info!(%address, "Generation proxy listening");
    }
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;
    Ok(())
}

/// Bind the configured address and serve with pooled keys from the environment.
#[instrument(skip(config), fields(bind = %config.proxy().bind()))]
pub async fn run(config: &ComicConfig) -> PanelcraftResult<()> {
    let listener = bind(config.proxy().bind()).await?;
    serve(listener, ProxyState::from_config(config)).await
}
