//! Well-known storage keys.
//!
//! Key names are part of the persisted format; renaming one orphans
//! existing data.

/// Serialized identity of the signed-in user.
pub const CURRENT_USER: &str = "current_user";

/// Raw Google access token for the current session.
pub const ACCESS_TOKEN: &str = "google_access_token";

/// Favorites list for anonymous sessions.
pub const LOCAL_FAVORITES: &str = "local_favorites";

/// User preference record (temperature unit).
pub const USER_PREFERENCES: &str = "user_preferences";

/// Favorites list scoped to a signed-in user.
pub fn favorites_for(user_id: &str) -> String {
    format!("favorites_{}", user_id)
}
