//! Resource domain - programs, orgs, projects and opportunities.
//!
//! The four families share one aggregate and one membership workflow; the
//! family is carried by [`ResourceKind`].

mod aggregate;
mod errors;
mod events;
mod kind;
mod member;

pub use aggregate::{Resource, ResourceDraft, ResourcePatch, UserRelationship};
pub use errors::ResourceError;
pub use events::{MembershipChange, MembershipEvent};
pub use kind::ResourceKind;
pub use member::Member;
