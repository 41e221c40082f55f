//! Authentication types for the domain layer.
//!
//! The signed-in user is stored in the server-side session by the account
//! module and restored on every request by the session middleware. The types
//! here carry no transport or storage concerns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Role, UserId};

/// Signed-in user restored from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,

    pub email: String,

    /// Display name if the account has one.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Roles granted to the account. Empty means plain `user`.
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user with the default `user` role.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            roles: vec![Role::User],
        }
    }

    /// Replaces the granted roles.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// Roles considered by the access-control lists.
    pub fn effective_roles(&self) -> Vec<Role> {
        if self.roles.is_empty() {
            vec![Role::User]
        } else {
            self.roles.clone()
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.effective_roles().contains(&role)
    }

    /// Access log identity: `Display Name <email>`.
    pub fn log_identity(&self) -> String {
        format!("{} <{}>", self.display_name_or_email(), self.email)
    }
}

/// Roles of an optional principal; anonymous requests are guests.
pub fn roles_of(user: Option<&AuthenticatedUser>) -> Vec<Role> {
    user.map(AuthenticatedUser::effective_roles)
        .unwrap_or_else(|| vec![Role::Guest])
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The operation requires a signed-in user.
    #[error("User is not signed in")]
    NotSignedIn,

    /// The principal lacks a required role or ownership.
    #[error("User is not authorized")]
    InsufficientPermissions,
}
