//! Feature flags configuration

use serde::{Deserialize, Serialize};

/// Feature flags exposed to templates and module configuration hooks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureFlags {
    /// Show the programs section in the client navigation
    #[serde(default = "default_true")]
    pub enable_programs: bool,

    /// Allow signed-in users to submit join requests
    #[serde(default = "default_true")]
    pub enable_join_requests: bool,

    /// Push membership changes over the real-time channel
    #[serde(default = "default_true")]
    pub enable_realtime: bool,

    /// Show the maintenance banner on every page
    #[serde(default)]
    pub maintenance_banner: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_programs: true,
            enable_join_requests: true,
            enable_realtime: true,
            maintenance_banner: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert!(flags.enable_programs);
        assert!(flags.enable_join_requests);
        assert!(flags.enable_realtime);
        assert!(!flags.maintenance_banner);
    }

    #[test]
    fn test_feature_flags_deserialization() {
        let json = r#"{
            "enable_programs": false,
            "maintenance_banner": true
        }"#;

        let flags: FeatureFlags = serde_json::from_str(json).unwrap();
        assert!(!flags.enable_programs);
        assert!(flags.enable_join_requests);
        assert!(flags.maintenance_banner);
    }
}
