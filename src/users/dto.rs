use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::{User, UserRole};

/// Request body for POST /users. Presence checks happen in the service so
/// a missing field yields the API's own error shape, not a serde reject.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub photo: Option<String>,
}

/// Request body for PUT /users/:id. Every field is optional; only the ones
/// actually present in the JSON are merged. `photo` uses a double Option so
/// an explicit `"photo": null` (clear the field) is distinguishable from
/// the key being absent (leave it alone).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "double_option")]
    pub photo: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Public projection of a user. No password material, camelCase timestamps.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub photo: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            photo: user.photo,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Confirmation snapshot returned by DELETE, captured before the row goes.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedUser {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_photo_absent_is_none() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Ada"));
        assert_eq!(req.photo, None);
    }

    #[test]
    fn update_photo_null_is_some_none() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"photo":null}"#).unwrap();
        assert_eq!(req.photo, Some(None));
    }

    #[test]
    fn update_photo_value_is_some_some() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"photo":"https://cdn.example.com/p.jpg"}"#).unwrap();
        assert_eq!(req.photo, Some(Some("https://cdn.example.com/p.jpg".into())));
    }

    #[test]
    fn create_accepts_missing_fields_for_service_validation() {
        let req: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn user_response_is_camel_case_without_password() {
        let user = User {
            id: 7,
            name: "Grace".into(),
            email: "grace@example.com".into(),
            password_hash: "hash".into(),
            role: UserRole::Admin,
            photo: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json.get("role").unwrap(), "ADMIN");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }
}
