//! Account creation and profile editing.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::crypto::{validate_password, CredentialService};
use crate::error::{QuireError, Result};
use crate::storage::{Collection, User, UserPatch};
use crate::view::UserView;

/// Profile changes a user (or an admin) may submit.
///
/// A new password goes through the same strength gate and hashing as
/// registration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserEdit {
    pub name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub admin: Option<bool>,
    pub password: Option<String>,
}

impl UserEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = Some(avatar);
        self
    }

    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// User registration and profile updates.
#[derive(Clone)]
pub struct Accounts {
    users: Arc<dyn Collection<User>>,
    credentials: CredentialService,
}

impl Accounts {
    pub fn new(users: Arc<dyn Collection<User>>, credentials: CredentialService) -> Self {
        Self { users, credentials }
    }

    /// Register a new user.
    ///
    /// The record is written only after hashing succeeds, so a rejected or
    /// failed registration leaves nothing behind.
    ///
    /// # Errors
    ///
    /// - `QuireError::InvalidInput` if the username is empty
    /// - `QuireError::DuplicateIdentity` if the username is taken
    /// - `QuireError::WeakCredential` if the password scores below the gate
    /// - `QuireError::HashingFailure` if hashing fails
    ///
    /// The uniqueness check and the insert are not atomic: two concurrent
    /// registrations of the same name can both pass the check, and the later
    /// write wins.
    pub async fn create_user(
        &self,
        username: &str,
        name: &str,
        plaintext: &str,
        admin: bool,
    ) -> Result<UserView> {
        if username.trim().is_empty() {
            return Err(QuireError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }
        let key = username.to_string();
        if self.users.has(&key)? {
            return Err(QuireError::DuplicateIdentity(key));
        }
        validate_password(plaintext)?;

        let password_hash = self
            .credentials
            .hash_async(Zeroizing::new(plaintext.to_string()))
            .await?;

        let user = User {
            username: key.clone(),
            name: name.to_string(),
            password_hash,
            admin,
            avatar: None,
            created: Utc::now(),
        };
        self.users.set(&key, &user)?;

        tracing::info!(username, admin, "Created user");
        Ok(UserView::from(user))
    }

    /// Apply profile changes to an existing user.
    ///
    /// # Errors
    ///
    /// - `QuireError::NotFound` if the user does not exist
    /// - `QuireError::WeakCredential` / `QuireError::HashingFailure` for a
    ///   new password, before anything is written
    pub async fn edit_user(&self, username: &str, edit: UserEdit) -> Result<UserView> {
        let key = username.to_string();
        if !self.users.has(&key)? {
            return Err(QuireError::NotFound(format!("User {}", username)));
        }

        let password_hash = match edit.password {
            Some(password) => {
                let password = Zeroizing::new(password);
                validate_password(&password)?;
                Some(self.credentials.hash_async(password).await?)
            }
            None => None,
        };

        let patch = UserPatch {
            name: edit.name,
            avatar: edit.avatar,
            admin: edit.admin,
            password_hash,
        };
        let updated = self
            .users
            .update(&key, patch)?
            .ok_or_else(|| QuireError::NotFound(format!("User {}", username)))?;

        tracing::info!(username, "Updated user");
        Ok(UserView::from(updated))
    }
}
