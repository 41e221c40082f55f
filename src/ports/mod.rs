//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ResourceRepository` - persistence for programs, orgs, projects and opportunities
//! - `ViewEngine` - server-side template rendering
//! - `MembershipNotifier` - real-time membership announcements

mod membership_notifier;
mod resource_repository;
mod view_engine;

pub use membership_notifier::{MembershipNotifier, NoopMembershipNotifier};
pub use resource_repository::ResourceRepository;
pub use view_engine::{ViewEngine, ViewError};
