//! Authentication and session-derived authorization.
//!
//! Authentication is stateless: each call checks submitted credentials
//! against the users collection and reports the outcome. Remembering a
//! successful login is the session store's job; [`SessionState`] is the
//! shape it records, and [`is_admin`] is the predicate the routing layer
//! gates admin pages on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::CredentialService;
use crate::error::Result;
use crate::storage::{Collection, User};

/// What a session store records for a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub logged: bool,
    pub username: Option<String>,
    pub admin: bool,
    pub avatar: Option<String>,
    pub name: Option<String>,
}

impl SessionState {
    /// A visitor who has not logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn for_user(user: &User) -> Self {
        Self {
            logged: true,
            username: Some(user.username.clone()),
            admin: user.admin,
            avatar: user.avatar.clone(),
            name: Some(user.name.clone()),
        }
    }
}

/// Outcome of one pass through the login flow.
///
/// `Anonymous` and `Authenticating` are the states before and during a
/// check; [`Authenticator::login`] only ever returns the two terminal ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated(SessionState),
    Rejected,
}

impl AuthState {
    /// Session to record, if authentication succeeded.
    pub fn session(&self) -> Option<&SessionState> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Whether a session belongs to a logged-in administrator.
pub fn is_admin(session: &SessionState) -> bool {
    session.logged && session.admin
}

/// Whether a session belongs to any logged-in user.
pub fn is_logged_in(session: &SessionState) -> bool {
    session.logged && session.username.is_some()
}

/// Checks submitted credentials against stored digests.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn Collection<User>>,
    credentials: CredentialService,
}

impl Authenticator {
    pub fn new(users: Arc<dyn Collection<User>>, credentials: CredentialService) -> Self {
        Self { users, credentials }
    }

    /// Verify a username/password pair.
    ///
    /// Fails closed: an unknown user, an empty password, or a wrong password
    /// all yield `Ok(false)`. Only storage or task failures are errors.
    pub async fn authenticate(&self, username: &str, plaintext: &str) -> Result<bool> {
        Ok(self.verify(username, plaintext).await?.is_some())
    }

    /// Run the login flow and produce the session to record on success.
    pub async fn login(&self, username: &str, plaintext: &str) -> Result<AuthState> {
        let mut state = AuthState::Anonymous;
        if !username.is_empty() {
            state = AuthState::Authenticating;
        }
        state = match (state, self.verify(username, plaintext).await?) {
            (AuthState::Authenticating, Some(user)) => {
                tracing::info!(username, "User authenticated");
                AuthState::Authenticated(SessionState::for_user(&user))
            }
            _ => {
                tracing::info!(username, "Authentication failed");
                AuthState::Rejected
            }
        };
        Ok(state)
    }

    async fn verify(&self, username: &str, plaintext: &str) -> Result<Option<User>> {
        if plaintext.is_empty() {
            return Ok(None);
        }
        let Some(user) = self.users.get(&username.to_string())? else {
            return Ok(None);
        };
        let matched = self
            .credentials
            .matches_async(
                Zeroizing::new(plaintext.to_string()),
                user.password_hash.clone(),
            )
            .await?;
        Ok(matched.then_some(user))
    }
}
