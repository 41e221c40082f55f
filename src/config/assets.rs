//! Static assets, uploads and view locations

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// One day, the cache lifetime of every static asset.
pub const STATIC_MAX_AGE_MS: u64 = 86_400_000;

/// Default request body ceiling (50 MB).
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Asset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Directory served under `/public`
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Additional folders, each served under `/{folder}` from `{folders_root}/{folder}`
    #[serde(default)]
    pub static_folders: Vec<String>,

    /// Directory the additional static folders are resolved against
    #[serde(default = "default_folders_root")]
    pub folders_root: PathBuf,

    /// Path prefix guarded by the uploads filter
    #[serde(default = "default_uploads_prefix")]
    pub uploads_prefix: String,

    /// Root directory of `.server.view.html` templates
    #[serde(default = "default_views_dir")]
    pub views_dir: PathBuf,

    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

impl AssetsConfig {
    /// Validate asset configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for folder in &self.static_folders {
            let trimmed = folder.trim_matches('/');
            if trimmed.is_empty() || trimmed.contains("..") {
                return Err(ValidationError::InvalidStaticFolder(folder.clone()));
            }
        }
        if !self.uploads_prefix.starts_with('/') {
            return Err(ValidationError::InvalidUploadsPrefix);
        }
        Ok(())
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            static_folders: Vec::new(),
            folders_root: default_folders_root(),
            uploads_prefix: default_uploads_prefix(),
            views_dir: default_views_dir(),
            body_limit: default_body_limit(),
        }
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_folders_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_uploads_prefix() -> String {
    "/uploads".to_string()
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("views")
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT
}
