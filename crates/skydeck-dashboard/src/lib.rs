//! Dashboard core for Skydeck.
//!
//! Owns the state machine, favorites persistence, the background
//! refresh scheduler, and the [`Dashboard`] coordinator the host embeds.

pub mod dashboard;
pub mod favorites;
pub mod scheduler;
pub mod state;

pub use dashboard::Dashboard;
pub use favorites::FavoritesStore;
pub use scheduler::RefreshScheduler;
pub use state::{
    Action, DashboardState, Notification, NotificationKind, StateStore, Tab,
};
