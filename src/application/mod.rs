//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::resource::{
    CreateResourceCommand, CreateResourceHandler, DeleteResourceCommand, DeleteResourceHandler,
    ListResourcesHandler, ListResourcesQuery, RequestMembershipCommand, RequestMembershipHandler,
    ReviewDecision, ReviewRequestCommand, ReviewRequestHandler, ReviewRequestResult,
    UpdateResourceCommand, UpdateResourceHandler,
};
