//! File-backed view engine.
//!
//! Reads `{root}/{name}.server.view.html` and substitutes placeholders from
//! JSON locals: `{{ key }}` is HTML-escaped, `{{{ key }}}` is inserted raw.
//! Keys may be dotted paths (`{{ user.displayName }}`). Missing keys render
//! as the empty string; arrays and objects render as JSON.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ViewEngine, ViewError};

/// Extension every server view carries.
pub const VIEW_EXTENSION: &str = "server.view.html";

/// View engine reading templates from a directory.
#[derive(Debug, Clone)]
pub struct FileViewEngine {
    root: PathBuf,
    cache: Option<Arc<RwLock<HashMap<String, Arc<str>>>>>,
}

impl FileViewEngine {
    /// Create an engine rooted at `root`. With `cache` set, each template is
    /// read from disk once.
    pub fn new(root: impl Into<PathBuf>, cache: bool) -> Self {
        Self {
            root: root.into(),
            cache: cache.then(|| Arc::new(RwLock::new(HashMap::new()))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn caching(&self) -> bool {
        self.cache.is_some()
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ViewError> {
        let valid = !name.is_empty()
            && name
                .split('/')
                .all(|part| !part.is_empty() && part != ".." && part != ".");
        if !valid {
            return Err(ViewError::NotFound(name.to_string()));
        }
        Ok(self.root.join(format!("{name}.{VIEW_EXTENSION}")))
    }

    async fn template(&self, name: &str) -> Result<Arc<str>, ViewError> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.read().await.get(name) {
                return Ok(hit.clone());
            }
        }

        let path = self.path_for(name)?;
        let source = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ViewError::NotFound(name.to_string())
            } else {
                ViewError::Io {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let source: Arc<str> = Arc::from(source);

        if let Some(cache) = &self.cache {
            cache.write().await.insert(name.to_string(), source.clone());
        }
        Ok(source)
    }
}

#[async_trait]
impl ViewEngine for FileViewEngine {
    async fn render(&self, name: &str, locals: &Value) -> Result<String, ViewError> {
        let template = self.template(name).await?;
        Ok(substitute(&template, locals))
    }

    async fn exists(&self, name: &str) -> bool {
        match self.path_for(name) {
            Ok(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// Replace every placeholder in `template`.
pub fn substitute(template: &str, locals: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start..];

        let (raw, open, close) = if after.starts_with("{{{") {
            (true, 3, "}}}")
        } else {
            (false, 2, "}}")
        };

        match after[open..].find(close) {
            Some(end) => {
                let key = after[open..open + end].trim();
                let value = lookup(locals, key);
                let text = display(value);
                if raw {
                    out.push_str(&text);
                } else {
                    out.push_str(&escape_html(&text));
                }
                rest = &after[open + end + close.len()..];
            }
            None => {
                // unterminated placeholder
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup<'a>(locals: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(locals, |value, part| value.get(part))
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
