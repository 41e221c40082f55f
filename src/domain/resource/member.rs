use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, UserId};

/// Summary of a user attached to a resource as owner, member or requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
}

impl Member {
    pub fn new(user_id: UserId, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

impl From<&AuthenticatedUser> for Member {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            user_id: user.id.clone(),
            display_name: user.display_name_or_email().to_string(),
            email: user.email.clone(),
        }
    }
}
