use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user as stored, including the password hash.
///
/// Deliberately does not implement `Serialize`: the hash must never reach a
/// response body. Handlers convert to [`User`] before responding.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// The public projection returned by the API.
    pub fn public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public user fields as exposed over the API and cached by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_projection_drops_hash() {
        let record = UserRecord {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
        };

        let public = record.public();
        assert_eq!(public.id, 1);
        assert_eq!(public.username, "alice");
        assert_eq!(public.email, "a@x.com");

        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
