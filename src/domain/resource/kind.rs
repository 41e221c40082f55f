//! Resource families served by the REST surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The four resource families. Each has its own routes and policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Program,
    Org,
    Project,
    Opportunity,
}

impl ResourceKind {
    /// All families in route registration order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Org,
        ResourceKind::Opportunity,
        ResourceKind::Project,
        ResourceKind::Program,
    ];

    /// Singular name used in scaffold and request paths (`/api/new/program`).
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Program => "program",
            ResourceKind::Org => "org",
            ResourceKind::Project => "project",
            ResourceKind::Opportunity => "opportunity",
        }
    }

    /// Plural name used in collection paths (`/api/programs`).
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Program => "programs",
            ResourceKind::Org => "orgs",
            ResourceKind::Project => "projects",
            ResourceKind::Opportunity => "opportunities",
        }
    }

    /// Stored discriminator.
    pub fn as_str(&self) -> &'static str {
        self.singular()
    }

    /// Message returned when a route id does not resolve.
    pub fn not_found_message(&self) -> String {
        format!("No {} with that identifier has been found", self.singular())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular())
    }
}

impl FromStr for ResourceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.singular() == s || kind.plural() == s)
            .ok_or_else(|| ValidationError::invalid_format("kind", format!("unknown kind '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_for_every_kind() {
        assert_eq!(ResourceKind::Program.plural(), "programs");
        assert_eq!(ResourceKind::Opportunity.plural(), "opportunities");
        assert_eq!(ResourceKind::Org.singular(), "org");
    }

    #[test]
    fn parses_singular_and_plural() {
        assert_eq!("project".parse::<ResourceKind>().unwrap(), ResourceKind::Project);
        assert_eq!("orgs".parse::<ResourceKind>().unwrap(), ResourceKind::Org);
        assert!("widgets".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn not_found_message_names_the_family() {
        assert_eq!(
            ResourceKind::Program.not_found_message(),
            "No program with that identifier has been found"
        );
    }

    #[test]
    fn registration_order_ends_with_programs() {
        assert_eq!(ResourceKind::ALL[0], ResourceKind::Org);
        assert_eq!(ResourceKind::ALL[3], ResourceKind::Program);
    }
}
