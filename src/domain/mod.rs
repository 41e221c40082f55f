//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, roles, timestamps, errors)
//! - `resource` - Programs, orgs, projects and opportunities with their membership workflow
//! - `authorization` - Access-control lists and the policy gate decision
//! - `session` - Server-side web session state

pub mod authorization;
pub mod foundation;
pub mod resource;
pub mod session;
