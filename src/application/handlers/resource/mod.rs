//! Resource command and query handlers.
//!
//! Handlers that act on a single resource receive it already resolved by the
//! route-parameter loader and never fetch it again.

mod create_resource;
mod delete_resource;
mod list_resources;
mod request_membership;
mod review_request;
mod update_resource;

pub use create_resource::{CreateResourceCommand, CreateResourceHandler};
pub use delete_resource::{DeleteResourceCommand, DeleteResourceHandler};
pub use list_resources::{ListResourcesHandler, ListResourcesQuery};
pub use request_membership::{RequestMembershipCommand, RequestMembershipHandler};
pub use review_request::{
    ReviewDecision, ReviewRequestCommand, ReviewRequestHandler, ReviewRequestResult,
};
pub use update_resource::{UpdateResourceCommand, UpdateResourceHandler};
