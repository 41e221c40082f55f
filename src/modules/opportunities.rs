//! Opportunities: procurement postings published by government users.

use axum::routing::get;

use crate::adapters::http::resources::{
    confirm_member, create, delete, deny_member, list, list_members, list_requests, new_scaffold,
    read, request_membership, update, RouteTable,
};
use crate::domain::authorization::{Acl, Action, ResourcePolicy};
use crate::domain::foundation::Role;
use crate::domain::resource::ResourceKind;

use super::family::ResourceFamily;

const COLLECTION: &str = "/api/opportunities";
const ITEM: &str = "/api/opportunities/:id";
const REQUESTS: &str = "/api/opportunities/requests/:id";
const CONFIRM: &str = "/api/opportunities/requests/confirm/:id/:user_id";
const DENY: &str = "/api/opportunities/requests/deny/:id/:user_id";

pub struct OpportunitiesPolicy;

impl ResourcePolicy for OpportunitiesPolicy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Opportunity
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
    RouteTable::new(ResourceKind::Opportunity)
        .guarded(COLLECTION, get(list).post(create))
        .guarded(ITEM, get(read).put(update).delete(delete))
        .open("/api/opportunities/members/:id", get(list_members))
        .guarded(REQUESTS, get(list_requests))
        .guarded(CONFIRM, get(confirm_member))
        .guarded(DENY, get(deny_member))
        .open("/api/new/opportunity", get(new_scaffold))
        .open("/api/request/opportunity/:id", get(request_membership))
}

pub fn module() -> ResourceFamily<OpportunitiesPolicy> {
    ResourceFamily::new("opportunities", OpportunitiesPolicy, routes)
}
