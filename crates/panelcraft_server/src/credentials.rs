//! Pooled provider credentials.

use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use panelcraft_models::ServiceKind;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::debug;

/// Provider keys held by the proxy, plus the token clients send to use them.
#[derive(Clone, Default)]
pub struct PooledCredentials {
    pool_token: String,
    keys: HashMap<ServiceKind, String>,
}

impl PooledCredentials {
    /// No pooled keys; `pool_token` still marks requests for substitution.
    pub fn new(pool_token: impl Into<String>) -> Self {
        Self {
            pool_token: pool_token.into(),
            keys: HashMap::new(),
        }
    }

    /// Read every provider's pooled key from its environment variable.
    pub fn from_env(pool_token: impl Into<String>) -> Self {
        let mut credentials = Self::new(pool_token);
        for kind in ServiceKind::iter() {
            if let Ok(key) = std::env::var(kind.pooled_key_var())
                && !key.trim().is_empty()
            {
                debug!(service = %kind, "Pooled credential loaded");
                credentials.keys.insert(kind, key);
            }
        }
        credentials
    }

    /// Add or replace one provider's pooled key.
    pub fn with_key(mut self, kind: ServiceKind, key: impl Into<String>) -> Self {
        self.keys.insert(kind, key.into());
        self
    }

    /// Pooled key for a provider, if configured.
    pub fn pooled(&self, kind: ServiceKind) -> Option<&str> {
        self.keys.get(&kind).map(String::as_str)
    }

    fn wants_pool(&self, supplied: &str) -> bool {
        let supplied = supplied.trim();
        supplied.is_empty() || (!self.pool_token.is_empty() && supplied == self.pool_token)
    }

    /// Credential to call `kind` with.
    ///
    /// An empty key or the pool token is replaced by the pooled key; anything
    /// else is the client's own credential and passes through.
    ///
    /// # Errors
    ///
    /// `CredentialMissing` when substitution is needed but no pooled key exists.
    pub fn resolve(&self, kind: ServiceKind, supplied: &str) -> PanelcraftResult<String> {
        if !self.wants_pool(supplied) {
            return Ok(supplied.to_string());
        }
        self.pooled(kind).map(str::to_string).ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::CredentialMissing(kind.to_string())).into()
        })
    }
}

impl std::fmt::Debug for PooledCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services: Vec<String> = self.keys.keys().map(ToString::to_string).collect();
        f.debug_struct("PooledCredentials")
            .field("pool_token_set", &!self.pool_token.is_empty())
            .field("services", &services)
            .finish()
    }
}
