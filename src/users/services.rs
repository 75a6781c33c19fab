use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::UserError;
use crate::users::dto::{CreateUserRequest, DeletedUser, UpdateUserRequest, UserResponse};
use crate::users::password;
use crate::users::repo::{is_unique_violation, UserStore};
use crate::users::repo_types::{NewUser, UserChanges};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Business rules for staff users. Talks to the persistence gateway
/// through `UserStore`, so tests can swap in an in-memory store.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    // Path ids arrive as raw strings; a non-numeric or non-positive value
    // is a validation failure, not a missing row.
    fn parse_id(raw: &str) -> Result<i32, UserError> {
        match raw.trim().parse::<i32>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(UserError::InvalidId),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, UserError> {
        let users = self.store.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_by_id(&self, raw_id: &str) -> Result<UserResponse, UserError> {
        let id = Self::parse_id(raw_id)?;
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;
        Ok(user.into())
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<UserResponse, UserError> {
        // Normalize before validating: trimmed name, trimmed lower-cased
        // email, defaulted role.
        let name = req.name.map(|n| n.trim().to_string()).unwrap_or_default();
        let email = req
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_default();
        let password = req.password.unwrap_or_default();
        let role = req.role.unwrap_or_default();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(UserError::MissingFields);
        }
        if !is_valid_email(&email) {
            return Err(UserError::InvalidEmail);
        }
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let password_hash = password::hash_password(&password)?;
        let created = self
            .store
            .insert(NewUser {
                name,
                email,
                password_hash,
                role,
                photo: req.photo,
            })
            .await
            .map_err(|e| {
                // Lost a create/create race to the unique index.
                if is_unique_violation(&e) {
                    UserError::DuplicateEmail
                } else {
                    UserError::Unexpected(e)
                }
            })?;
        debug!(user_id = created.id, "user created");
        Ok(created.into())
    }

    // Check order is observable through the error kinds: id validity,
    // then existence, then email uniqueness, then the merge.
    pub async fn update(
        &self,
        raw_id: &str,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, UserError> {
        let id = Self::parse_id(raw_id)?;
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        let email = match req.email.as_deref() {
            Some(raw) => {
                let email = normalize_email(raw);
                if !is_valid_email(&email) {
                    return Err(UserError::InvalidEmail);
                }
                if email != existing.email {
                    if let Some(other) = self.store.find_by_email(&email).await? {
                        if other.id != id {
                            return Err(UserError::EmailInUse);
                        }
                    }
                }
                email
            }
            None => existing.email.clone(),
        };

        let password_hash = match req.password {
            Some(plain) => password::hash_password(&plain)?,
            None => existing.password_hash.clone(),
        };

        let changes = UserChanges {
            name: req
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| existing.name.clone()),
            email,
            password_hash,
            role: req.role.unwrap_or(existing.role),
            photo: match req.photo {
                Some(photo) => photo,           // provided, possibly as an explicit null
                None => existing.photo.clone(), // not provided, leave untouched
            },
        };

        let updated = self
            .store
            .update(id, changes)
            .await?
            .ok_or(UserError::NotFound)?;
        Ok(updated.into())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<DeletedUser, UserError> {
        let id = Self::parse_id(raw_id)?;
        let user = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;
        let snapshot = DeletedUser {
            id: user.id,
            name: user.name,
            email: user.email,
        };
        if !self.store.delete(id).await? {
            return Err(UserError::NotFound);
        }
        debug!(user_id = snapshot.id, "user deleted");
        Ok(snapshot)
    }
}
