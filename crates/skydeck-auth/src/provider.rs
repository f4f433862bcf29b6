//! Identity provider capability.

use async_trait::async_trait;

use skydeck_core::AuthError;

use crate::identity::Identity;

/// An interactive identity source. `sign_in` may suspend indefinitely
/// while the user works through the provider's consent flow; callers
/// must not assume it resolves promptly.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the consent flow to completion.
    async fn sign_in(&self) -> Result<Identity, AuthError>;

    /// Release the session with the provider. Best-effort: failures are
    /// logged by the implementation and never surface to the caller.
    async fn sign_out(&self, identity: &Identity);
}
