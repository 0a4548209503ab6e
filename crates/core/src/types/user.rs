//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The profile the server derives from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response envelope of `GET /api/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: Profile,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_envelope_unwraps_profile() {
        let envelope: UserEnvelope = serde_json::from_value(json!({
            "user": { "id": 3, "nombre": "Ana", "email": "ana@example.com" }
        }))
        .unwrap();

        assert_eq!(envelope.user.id, UserId::new(3));
        assert_eq!(envelope.user.name, "Ana");
    }

    #[test]
    fn test_profile_accepts_english_name_field() {
        let profile: Profile = serde_json::from_value(json!({ "id": 1, "name": "Bo" })).unwrap();
        assert_eq!(profile.name, "Bo");
        assert_eq!(profile.email, None);
    }
}
