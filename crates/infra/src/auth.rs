//! Bearer token sources

use async_trait::async_trait;
use parking_lot::RwLock;
use timealign_core::BearerTokenProvider;

/// Token held in memory and replaced by whoever completes sign-in.
///
/// Acquiring and refreshing the token happens outside this crate.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: RwLock<Option<String>>,
}

impl StaticTokenProvider {
    /// Provider starting with `token`, or none.
    pub fn new(token: Option<String>) -> Self {
        Self { token: RwLock::new(token) }
    }

    /// Replace the token for subsequent requests.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    /// Forget the token, e.g. after the store rejected it.
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

#[async_trait]
impl BearerTokenProvider for StaticTokenProvider {
    async fn current_token(&self) -> Option<String> {
        self.token.read().clone()
    }
}
