//! HTTP handlers shared by every resource family.
//!
//! Family is carried in [`FamilyState::kind`]; `:id` routes receive their
//! entity from the loader through [`LoadedResource`].

use axum::{
    extract::{Path, State},
    Json,
};

use crate::adapters::http::extract::JsonOrForm;
use crate::adapters::http::middleware::CurrentUser;
use crate::adapters::http::state::AppState;
use crate::application::{
    CreateResourceCommand, DeleteResourceCommand, ListResourcesQuery, RequestMembershipCommand,
    ReviewDecision, ReviewRequestCommand, UpdateResourceCommand,
};
use crate::domain::foundation::UserId;
use crate::domain::resource::{ResourceError, ResourceKind};

use super::dto::{
    CreateResourceRequest, MemberResponse, ResourceDetailResponse, ResourceResponse,
    ReviewResponse, ScaffoldResponse, UpdateResourceRequest,
};
use super::error::ResourceApiError;
use super::loader::LoadedResource;

/// Router state for one resource family.
#[derive(Clone)]
pub struct FamilyState {
    pub app: AppState,
    pub kind: ResourceKind,
}

type ApiResult<T> = Result<Json<T>, ResourceApiError>;

/// `GET /api/{plural}`
pub async fn list(State(family): State<FamilyState>) -> ApiResult<Vec<ResourceResponse>> {
    let resources = family
        .app
        .list_handler()
        .handle(ListResourcesQuery { kind: family.kind })
        .await?;
    Ok(Json(resources.iter().map(ResourceResponse::from).collect()))
}

/// `POST /api/{plural}`
pub async fn create(
    State(family): State<FamilyState>,
    CurrentUser(user): CurrentUser,
    JsonOrForm(body): JsonOrForm<CreateResourceRequest>,
) -> ApiResult<ResourceDetailResponse> {
    let viewer = user.as_ref().map(|u| u.id.clone());
    let resource = family
        .app
        .create_handler()
        .handle(CreateResourceCommand {
            kind: family.kind,
            creator: user,
            draft: body.into(),
        })
        .await?;
    Ok(Json(ResourceDetailResponse::for_viewer(
        &resource,
        viewer.as_ref(),
    )))
}

/// `GET /api/{plural}/:id`
pub async fn read(
    CurrentUser(user): CurrentUser,
    LoadedResource(resource): LoadedResource,
) -> Json<ResourceDetailResponse> {
    Json(ResourceDetailResponse::for_viewer(
        &resource,
        user.as_ref().map(|u| &u.id),
    ))
}

/// `PUT /api/{plural}/:id`
pub async fn update(
    State(family): State<FamilyState>,
    CurrentUser(user): CurrentUser,
    LoadedResource(resource): LoadedResource,
    JsonOrForm(body): JsonOrForm<UpdateResourceRequest>,
) -> ApiResult<ResourceDetailResponse> {
    let updated = family
        .app
        .update_handler()
        .handle(UpdateResourceCommand {
            resource,
            patch: body.into(),
        })
        .await?;
    Ok(Json(ResourceDetailResponse::for_viewer(
        &updated,
        user.as_ref().map(|u| &u.id),
    )))
}

/// `DELETE /api/{plural}/:id`
pub async fn delete(
    State(family): State<FamilyState>,
    LoadedResource(resource): LoadedResource,
) -> ApiResult<ResourceResponse> {
    let removed = family
        .app
        .delete_handler()
        .handle(DeleteResourceCommand { resource })
        .await?;
    Ok(Json(ResourceResponse::from(&removed)))
}

/// `GET /api/{plural}/members/:id`
pub async fn list_members(LoadedResource(resource): LoadedResource) -> Json<Vec<MemberResponse>> {
    Json(resource.members.iter().map(MemberResponse::from).collect())
}

/// `GET /api/{plural}/requests/:id`
pub async fn list_requests(
    LoadedResource(resource): LoadedResource,
) -> Json<Vec<MemberResponse>> {
    Json(resource.requests.iter().map(MemberResponse::from).collect())
}

/// `GET /api/{plural}/requests/confirm/:id/:user_id`
pub async fn confirm_member(
    State(family): State<FamilyState>,
    LoadedResource(resource): LoadedResource,
    Path((_, user_id)): Path<(String, String)>,
) -> ApiResult<ReviewResponse> {
    review(family, resource, &user_id, ReviewDecision::Confirm).await
}

/// `GET /api/{plural}/requests/deny/:id/:user_id`
pub async fn deny_member(
    State(family): State<FamilyState>,
    LoadedResource(resource): LoadedResource,
    Path((_, user_id)): Path<(String, String)>,
) -> ApiResult<ReviewResponse> {
    review(family, resource, &user_id, ReviewDecision::Deny).await
}

async fn review(
    family: FamilyState,
    resource: crate::domain::resource::Resource,
    user_id: &str,
    decision: ReviewDecision,
) -> ApiResult<ReviewResponse> {
    let user_id = UserId::new(user_id)
        .map_err(|e| ResourceError::validation("user_id", e.to_string()))?;
    let result = family
        .app
        .review_request_handler()
        .handle(ReviewRequestCommand {
            resource,
            user_id,
            decision,
        })
        .await?;

    let message = match decision {
        ReviewDecision::Confirm => format!(
            "{} is now a member of {}",
            result.member.display_name, result.resource.title
        ),
        ReviewDecision::Deny => format!(
            "Request from {} to join {} was denied",
            result.member.display_name, result.resource.title
        ),
    };
    Ok(Json(ReviewResponse {
        message,
        member: MemberResponse::from(&result.member),
        resource: ResourceResponse::from(&result.resource),
    }))
}

/// `GET /api/new/{singular}`
pub async fn new_scaffold(State(family): State<FamilyState>) -> Json<ScaffoldResponse> {
    Json(ScaffoldResponse::empty(family.kind))
}

/// `GET /api/request/{singular}/:id`
pub async fn request_membership(
    State(family): State<FamilyState>,
    CurrentUser(user): CurrentUser,
    LoadedResource(resource): LoadedResource,
) -> ApiResult<ResourceDetailResponse> {
    let viewer = user.as_ref().map(|u| u.id.clone());
    let resource = family
        .app
        .request_membership_handler()
        .handle(RequestMembershipCommand {
            resource,
            requester: user,
        })
        .await?;
    Ok(Json(ResourceDetailResponse::for_viewer(
        &resource,
        viewer.as_ref(),
    )))
}
