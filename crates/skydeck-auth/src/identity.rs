//! The signed-in user.

use serde::{Deserialize, Serialize};

/// Identity produced by the consent flow. Persisted opaquely (JSON)
/// under the `current_user` storage key for the session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable provider-assigned id; scopes the favorites list.
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Present only while the session's token is known; never required
    /// for reading identity-scoped data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Identity {
    /// Given name for greetings, falling back to the full name.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn identity(name: &str) -> Identity {
        Identity {
            id: "108234".to_string(),
            name: name.to_string(),
            email: "asha@example.com".to_string(),
            avatar_url: None,
            access_token: None,
        }
    }

    #[test]
    fn test_first_name() {
        assert_eq!(identity("Asha Rao").first_name(), "Asha");
        assert_eq!(identity("Asha").first_name(), "Asha");
    }

    #[test]
    fn test_serialization_omits_absent_token() {
        let json = serde_json::to_string(&identity("Asha")).unwrap();
        assert!(!json.contains("access_token"));
        assert!(!json.contains("avatar_url"));
    }

    #[test]
    fn test_round_trip_with_token() {
        let mut id = identity("Asha Rao");
        id.access_token = Some("ya29.token".to_string());
        let json = serde_json::to_string(&id).unwrap();
        let parsed: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
