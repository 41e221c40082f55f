//! Server modules registered at startup.
//!
//! - `orgs`, `opportunities`, `projects`, `programs` - resource families
//! - `core` - layout page, error pages and the catch-all, always last

pub mod core;
pub mod family;
pub mod opportunities;
pub mod orgs;
pub mod programs;
pub mod projects;

pub use self::core::CoreModule;
pub use family::{ResourceFamily, JOIN_REQUEST_PREFIX};
