//! Application state for the web layer.

use std::sync::Arc;

use crate::alias::AliasResolver;
use crate::auth::CredentialGate;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Alias resolver, the only owner of the alias index
    pub resolver: Arc<AliasResolver>,

    /// Credential check run before every alias operation
    pub gate: Arc<dyn CredentialGate>,

    /// Path segment the alias routes are nested under
    pub api_version: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        resolver: AliasResolver,
        gate: impl CredentialGate + 'static,
        api_version: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            gate: Arc::new(gate),
            api_version: api_version.into(),
        }
    }
}
