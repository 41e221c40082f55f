//! Per-family access policies and the gate decision.

use crate::domain::foundation::{roles_of, AuthenticatedUser};
use crate::domain::resource::{Resource, ResourceKind};

use super::{Acl, Action};

/// Declares which roles may call which routes of one resource family.
pub trait ResourcePolicy: Send + Sync {
    /// Family this policy guards.
    fn kind(&self) -> ResourceKind;

    /// Register the family's grants. Safe to call more than once.
    fn invoke_roles_policies(&self, acl: &Acl);
}

/// Everything the gate looks at for one request.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    pub user: Option<&'a AuthenticatedUser>,
    pub resource: Option<&'a Resource>,
    /// Matched route pattern, e.g. `/api/programs/:id`.
    pub route: &'a str,
    pub action: Action,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The signed-in user owns the loaded resource.
    Owner,
    /// The user's roles hold a matching grant.
    Granted,
    Denied,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, AccessDecision::Denied)
    }
}

/// Decide access: resource owners first, then role grants.
pub fn decide(acl: &Acl, request: AccessRequest<'_>) -> AccessDecision {
    if let (Some(user), Some(resource)) = (request.user, request.resource) {
        if resource.is_admin(&user.id) {
            return AccessDecision::Owner;
        }
    }

    let roles = roles_of(request.user);
    if acl.is_allowed(&roles, request.route, request.action) {
        AccessDecision::Granted
    } else {
        AccessDecision::Denied
    }
}
