//! Static module registry.

use crate::modules::{opportunities, orgs, programs, projects, CoreModule};

use super::module::ServerModule;

/// Every module in registration order. `core` owns the catch-all and must
/// stay last.
pub fn default_modules() -> Vec<Box<dyn ServerModule>> {
    vec![
        Box::new(orgs::module()),
        Box::new(opportunities::module()),
        Box::new(projects::module()),
        Box::new(programs::module()),
        Box::new(CoreModule),
    ]
}
