//! # auth-adapters
//!
//! Thin wrappers over the external identity provider. Tokens are minted
//! elsewhere; this layer only verifies them and hands the rest of the app
//! an opaque [`Viewer`]. Unverifiable tokens resolve to the anonymous
//! viewer — reads are public, and the write paths reject anonymity
//! themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use domains::{IdentityProvider, Result, Viewer};

#[cfg(feature = "auth-jwt")]
mod jwt;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtIdentityProvider;

/// Fixed token → viewer table. Backs tests, seeding, and local development
/// without the real provider.
#[derive(Default)]
pub struct StaticIdentityProvider {
    viewers: HashMap<String, Viewer>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewer(mut self, token: impl Into<String>, viewer: Viewer) -> Self {
        self.viewers.insert(token.into(), viewer);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, bearer_token: Option<&str>) -> Result<Viewer> {
        Ok(bearer_token
            .and_then(|token| self.viewers.get(token))
            .cloned()
            .unwrap_or_else(Viewer::anonymous))
    }
}
