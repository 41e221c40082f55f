//! HTTP DTOs for the resource endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::resource::{
    Member, Resource, ResourceDraft, ResourceKind, ResourcePatch, UserRelationship,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/{plural}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResourceRequest {
    pub title: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub description: String,
}

impl From<CreateResourceRequest> for ResourceDraft {
    fn from(request: CreateResourceRequest) -> Self {
        Self {
            title: request.title,
            short: request.short,
            description: request.description,
        }
    }
}

/// Body of `PUT /api/{plural}/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub short: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateResourceRequest> for ResourcePatch {
    fn from(request: UpdateResourceRequest) -> Self {
        Self {
            title: request.title,
            short: request.short,
            description: request.description,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            user_id: member.user_id.to_string(),
            display_name: member.display_name.clone(),
            email: member.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub kind: ResourceKind,
    pub title: String,
    pub short: String,
    pub description: String,
    pub owner: MemberResponse,
    pub members: Vec<MemberResponse>,
    pub requests: Vec<MemberResponse>,
    /// ISO 8601
    pub created: String,
    pub updated: String,
}

impl From<&Resource> for ResourceResponse {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id.to_string(),
            kind: resource.kind,
            title: resource.title.clone(),
            short: resource.short.clone(),
            description: resource.description.clone(),
            owner: MemberResponse::from(&resource.owner),
            members: resource.members.iter().map(MemberResponse::from).collect(),
            requests: resource.requests.iter().map(MemberResponse::from).collect(),
            created: resource.created_at.as_datetime().to_rfc3339(),
            updated: resource.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// A single resource as seen by the current user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetailResponse {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    pub user_is: UserRelationshipResponse,
}

impl ResourceDetailResponse {
    pub fn for_viewer(resource: &Resource, viewer: Option<&UserId>) -> Self {
        Self {
            resource: ResourceResponse::from(resource),
            user_is: resource.relationship(viewer).into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct UserRelationshipResponse {
    pub admin: bool,
    pub member: bool,
    pub request: bool,
}

impl From<UserRelationship> for UserRelationshipResponse {
    fn from(rel: UserRelationship) -> Self {
        Self {
            admin: rel.admin,
            member: rel.member,
            request: rel.request,
        }
    }
}

/// Empty form returned by `GET /api/new/{singular}`.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldResponse {
    pub kind: ResourceKind,
    pub title: String,
    pub short: String,
    pub description: String,
}

impl ScaffoldResponse {
    pub fn empty(kind: ResourceKind) -> Self {
        Self {
            kind,
            title: String::new(),
            short: String::new(),
            description: String::new(),
        }
    }
}

/// Result of confirming or denying a join request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub message: String,
    pub member: MemberResponse,
    pub resource: ResourceResponse,
}
