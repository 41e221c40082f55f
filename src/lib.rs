//! Developers' Exchange server.
//!
//! Bootstrap, middleware chain, access policies and REST routes for the
//! programs, organizations, projects and opportunities of the community
//! platform, plus real-time membership updates.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod modules;
pub mod observability;
pub mod ports;

pub use bootstrap::{build_app, BootstrapError, Dependencies};
