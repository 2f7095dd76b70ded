//! Bearer token port
//!
//! Token acquisition (OAuth consent, refresh) lives outside this workspace;
//! store and calendar adapters only ask for whatever token is current.

use async_trait::async_trait;

/// Supplies the bearer token attached to every store call.
#[async_trait]
pub trait BearerTokenProvider: Send + Sync {
    /// Current token, or `None` when the user has not authenticated.
    async fn current_token(&self) -> Option<String>;
}
