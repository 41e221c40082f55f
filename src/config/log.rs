//! Access log configuration

use serde::Deserialize;

/// Access logging is enabled only when a format is configured.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    /// Access log line format: `combined`, `common`, `short` or `dev`
    #[serde(default)]
    pub format: Option<AccessLogFormat>,
}

/// Access log line layout
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    Combined,
    Common,
    Short,
    Dev,
}

impl LogConfig {
    pub fn access_log_enabled(&self) -> bool {
        self.format.is_some()
    }
}
