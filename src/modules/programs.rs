//! Programs: government-run initiatives grouping projects.

use axum::routing::get;

use crate::adapters::http::resources::{
    confirm_member, create, delete, deny_member, list, list_members, list_requests, new_scaffold,
    read, request_membership, update, RouteTable,
};
use crate::domain::authorization::{Acl, Action, ResourcePolicy};
use crate::domain::foundation::Role;
use crate::domain::resource::ResourceKind;

use super::family::ResourceFamily;

const COLLECTION: &str = "/api/programs";
const ITEM: &str = "/api/programs/:id";
const REQUESTS: &str = "/api/programs/requests/:id";
const CONFIRM: &str = "/api/programs/requests/confirm/:id/:user_id";
const DENY: &str = "/api/programs/requests/deny/:id/:user_id";

pub struct ProgramsPolicy;

impl ResourcePolicy for ProgramsPolicy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Program
    }

    fn invoke_roles_policies(&self, acl: &Acl) {
        acl.allow(
            &[Role::Admin],
            &[COLLECTION, ITEM, REQUESTS, CONFIRM, DENY],
            &[Action::Any],
        );
        acl.allow(
            &[Role::Gov, Role::User, Role::Guest],
            &[COLLECTION, ITEM],
            &[Action::Get],
        );
    }
}

pub fn routes() -> RouteTable {
    RouteTable::new(ResourceKind::Program)
        .guarded(COLLECTION, get(list).post(create))
        .guarded(ITEM, get(read).put(update).delete(delete))
        .open("/api/programs/members/:id", get(list_members))
        .guarded(REQUESTS, get(list_requests))
        .guarded(CONFIRM, get(confirm_member))
        .guarded(DENY, get(deny_member))
        .open("/api/new/program", get(new_scaffold))
        .open("/api/request/program/:id", get(request_membership))
}

pub fn module() -> ResourceFamily<ProgramsPolicy> {
    ResourceFamily::new("programs", ProgramsPolicy, routes)
}
