//! HTTP adapters.
//!
//! - `middleware` - the global middleware chain
//! - `resources` - routes, loader and policy gate shared by the resource families
//! - `state` - shared application state

pub mod error;
pub mod extract;
pub mod middleware;
pub mod resources;
pub mod state;

pub use error::UnhandledError;
pub use extract::JsonOrForm;
pub use state::AppState;
