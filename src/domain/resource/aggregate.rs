//! Resource aggregate entity.
//!
//! A resource is a program, org, project or opportunity. All four families
//! share the same shape and membership workflow: the creator owns the
//! resource, other users submit join requests which the owner confirms or
//! denies.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ResourceId, Timestamp, UserId, ValidationError};

use super::{Member, ResourceError, ResourceKind};

const MAX_TITLE_LEN: usize = 200;
const MAX_SHORT_LEN: usize = 400;

/// Resource aggregate.
///
/// # Invariants
///
/// - `title` is non-empty and at most 200 characters
/// - the owner is always a confirmed member
/// - a user appears at most once across `members` and `requests`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub title: String,
    pub short: String,
    pub description: String,
    pub owner: Member,
    pub members: Vec<Member>,
    pub requests: Vec<Member>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields supplied when creating a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDraft {
    pub title: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub short: Option<String>,
    pub description: Option<String>,
}

/// How a given user relates to a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRelationship {
    pub admin: bool,
    pub member: bool,
    pub request: bool,
}

impl Resource {
    /// Create a new resource owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title is blank or a field is too long.
    pub fn create(
        kind: ResourceKind,
        owner: Member,
        draft: ResourceDraft,
    ) -> Result<Self, ValidationError> {
        let title = validate_title(&draft.title)?;
        validate_short(&draft.short)?;
        let now = Timestamp::now();
        Ok(Self {
            id: ResourceId::new(),
            kind,
            title,
            short: draft.short.trim().to_string(),
            description: draft.description,
            members: vec![owner.clone()],
            owner,
            requests: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update.
    pub fn apply_patch(&mut self, patch: ResourcePatch) -> Result<(), ValidationError> {
        if let Some(title) = patch.title.as_deref() {
            self.title = validate_title(title)?;
        }
        if let Some(short) = patch.short {
            validate_short(&short)?;
            self.short = short.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.touch();
        Ok(())
    }

    /// The owner administers the resource.
    pub fn is_admin(&self, user_id: &UserId) -> bool {
        &self.owner.user_id == user_id
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.user_id == user_id)
    }

    pub fn has_pending_request(&self, user_id: &UserId) -> bool {
        self.requests.iter().any(|m| &m.user_id == user_id)
    }

    /// Relationship flags for an optional viewer.
    pub fn relationship(&self, user_id: Option<&UserId>) -> UserRelationship {
        match user_id {
            Some(id) => UserRelationship {
                admin: self.is_admin(id),
                member: self.is_member(id),
                request: self.has_pending_request(id),
            },
            None => UserRelationship::default(),
        }
    }

    /// Record a join request from `requester`.
    pub fn request_membership(&mut self, requester: Member) -> Result<(), ResourceError> {
        if self.is_member(&requester.user_id) {
            return Err(ResourceError::AlreadyMember(requester.user_id));
        }
        if self.has_pending_request(&requester.user_id) {
            return Err(ResourceError::AlreadyRequested(requester.user_id));
        }
        self.requests.push(requester);
        self.touch();
        Ok(())
    }

    /// Move a pending request into the member list.
    pub fn confirm_member(&mut self, user_id: &UserId) -> Result<Member, ResourceError> {
        let member = self.take_request(user_id)?;
        self.members.push(member.clone());
        self.touch();
        Ok(member)
    }

    /// Drop a pending request.
    pub fn deny_member(&mut self, user_id: &UserId) -> Result<Member, ResourceError> {
        let member = self.take_request(user_id)?;
        self.touch();
        Ok(member)
    }

    fn take_request(&mut self, user_id: &UserId) -> Result<Member, ResourceError> {
        let index = self
            .requests
            .iter()
            .position(|m| &m.user_id == user_id)
            .ok_or_else(|| ResourceError::NoPendingRequest(user_id.clone()))?;
        Ok(self.requests.remove(index))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::too_long("title", MAX_TITLE_LEN, len));
    }
    Ok(title.to_string())
}

fn validate_short(short: &str) -> Result<(), ValidationError> {
    let len = short.trim().chars().count();
    if len > MAX_SHORT_LEN {
        return Err(ValidationError::too_long("short", MAX_SHORT_LEN, len));
    }
    Ok(())
}
