//! Organizations: any signed-in user may register one.

use axum::routing::get;

use crate::adapters::http::resources::{
    confirm_member, create, delete, deny_member, list, list_members, list_requests, new_scaffold,
    read, request_membership, update, RouteTable,
};
use crate::domain::authorization::{Acl, Action, ResourcePolicy};
use crate::domain::foundation::Role;
use crate::domain::resource::ResourceKind;

use super::family::ResourceFamily;

const COLLECTION: &str = "/api/orgs";
const ITEM: &str = "/api/orgs/:id";
const REQUESTS: &str = "/api/orgs/requests/:id";
const CONFIRM: &str = "/api/orgs/requests/confirm/:id/:user_id";
const DENY: &str = "/api/orgs/requests/deny/:id/:user_id";

pub struct OrgsPolicy;

impl ResourcePolicy for OrgsPolicy {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Org
    }

    fn invoke_roles_policies(&self, acl: &Acl) {
        acl.allow(
            &[Role::Admin],
            &[COLLECTION, ITEM, REQUESTS, CONFIRM, DENY],
            &[Action::Any],
        );
        acl.allow(&[Role::User, Role::Gov], &[COLLECTION], &[Action::Post]);
        acl.allow(
            &[Role::Gov, Role::User, Role::Guest],
            &[COLLECTION, ITEM],
            &[Action::Get],
        );
    }
}

pub fn routes() -> RouteTable {
    RouteTable::new(ResourceKind::Org)
        .guarded(COLLECTION, get(list).post(create))
        .guarded(ITEM, get(read).put(update).delete(delete))
        .open("/api/orgs/members/:id", get(list_members))
        .guarded(REQUESTS, get(list_requests))
        .guarded(CONFIRM, get(confirm_member))
        .guarded(DENY, get(deny_member))
        .open("/api/new/org", get(new_scaffold))
        .open("/api/request/org/:id", get(request_membership))
}

pub fn module() -> ResourceFamily<OrgsPolicy> {
    ResourceFamily::new("orgs", OrgsPolicy, routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_users_may_create() {
        let acl = Acl::new();
        OrgsPolicy.invoke_roles_policies(&acl);

        assert!(acl.is_allowed(&[Role::User], COLLECTION, Action::Post));
        assert!(!acl.is_allowed(&[Role::Guest], COLLECTION, Action::Post));
        assert!(!acl.is_allowed(&[Role::User], ITEM, Action::Put));
    }
}
