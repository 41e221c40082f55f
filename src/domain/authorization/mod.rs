//! Authorization - role grants per route pattern and the policy gate decision.

mod acl;
mod action;
mod policy;

pub use acl::Acl;
pub use action::Action;
pub use policy::{decide, AccessDecision, AccessRequest, ResourcePolicy};
