//! Projects: proposed by users, often attached to a program.

use axum::routing::get;

use crate::adapters::http::resources::{
    confirm_member, create, delete, deny_member, list, list_members, list_requests, new_scaffold,
    read, request_membership, update, RouteTable,
};
use crate::domain::authorization::{Acl, Action, ResourcePolicy};
use crate::domain::foundation::Role;
use crate::domain::resource::ResourceKind;

use super::family::ResourceFamily;

const COLLECTION: &str = "/api/projects";
const ITEM: &str = "/api/projects/:id";
const REQUESTS: &str = "/api/projects/requests/:id";
const CONFIRM: &str = "/api/projects/requests/confirm/:id/:user_id";
const DENY: &str = "/api/projects/requests/deny/:id/:user_id";

pub struct ProjectsPolicy;

impl ResourcePolicy for ProjectsPolicy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Project
    }

    fn invoke_roles_policies(&self, acl: &Acl) {
        acl.allow(
            &[Role::Admin],
            &[COLLECTION, ITEM, REQUESTS, CONFIRM, DENY],
            &[Action::Any],
        );
        acl.allow(&[Role::Gov], &[COLLECTION], &[Action::Post]);
        acl.allow(
            &[Role::Gov, Role::User, Role::Guest],
            &[COLLECTION, ITEM],
            &[Action::Get],
        );
    }
}

pub fn routes() -> RouteTable {
    RouteTable::new(ResourceKind::Project)
        .guarded(COLLECTION, get(list).post(create))
        .guarded(ITEM, get(read).put(update).delete(delete))
        .open("/api/projects/members/:id", get(list_members))
        .guarded(REQUESTS, get(list_requests))
        .guarded(CONFIRM, get(confirm_member))
        .guarded(DENY, get(deny_member))
        .open("/api/new/project", get(new_scaffold))
        .open("/api/request/project/:id", get(request_membership))
}

pub fn module() -> ResourceFamily<ProjectsPolicy> {
    ResourceFamily::new("projects", ProjectsPolicy, routes)
}
