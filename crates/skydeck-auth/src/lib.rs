//! Identity for the Skydeck dashboard.
//!
//! Defines the [`Identity`] record and the [`IdentityProvider`]
//! capability, with a Google OAuth2 implementation that drives the
//! interactive consent flow through the system browser.

pub mod google;
pub mod identity;
pub mod provider;

pub use google::GoogleIdentityProvider;
pub use identity::Identity;
pub use provider::IdentityProvider;
