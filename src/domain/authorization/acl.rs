//! Role-based access-control list.
//!
//! Grants are `(role, route pattern, action)` triples held in a set, so
//! registering the same permissions twice leaves the list unchanged.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::domain::foundation::Role;

use super::Action;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Grant {
    role: Role,
    resource: String,
    action: Action,
}

/// Shared access-control list.
#[derive(Debug, Default)]
pub struct Acl {
    grants: RwLock<HashSet<Grant>>,
}

impl Acl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant every role every action on every resource pattern.
    ///
    /// Returns the number of grants that were not already present.
    pub fn allow(&self, roles: &[Role], resources: &[&str], actions: &[Action]) -> usize {
        let mut grants = self.grants.write().unwrap_or_else(|e| e.into_inner());
        let mut added = 0;
        for role in roles {
            for resource in resources {
                for action in actions {
                    let grant = Grant {
                        role: *role,
                        resource: (*resource).to_string(),
                        action: *action,
                    };
                    if grants.insert(grant) {
                        added += 1;
                    }
                }
            }
        }
        added
    }

    /// True if any of `roles` holds a grant covering `action` on `resource`.
    pub fn is_allowed(&self, roles: &[Role], resource: &str, action: Action) -> bool {
        let grants = self.grants.read().unwrap_or_else(|e| e.into_inner());
        grants.iter().any(|grant| {
            roles.contains(&grant.role) && grant.resource == resource && grant.action.covers(action)
        })
    }

    /// Number of distinct grants.
    pub fn grant_count(&self) -> usize {
        self.grants.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
