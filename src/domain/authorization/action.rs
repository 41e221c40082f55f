use serde::{Deserialize, Serialize};
use std::fmt;

/// An HTTP verb as seen by the access-control lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Get,
    Post,
    Put,
    Delete,
    /// Wildcard grant covering every verb.
    Any,
}

impl Action {
    /// Map a request method name; `HEAD` is treated as `GET`.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" | "HEAD" => Some(Action::Get),
            "POST" => Some(Action::Post),
            "PUT" | "PATCH" => Some(Action::Put),
            "DELETE" => Some(Action::Delete),
            _ => None,
        }
    }

    /// True if a grant for `self` covers a request for `requested`.
    pub fn covers(&self, requested: Action) -> bool {
        *self == Action::Any || *self == requested
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Get => "get",
            Action::Post => "post",
            Action::Put => "put",
            Action::Delete => "delete",
            Action::Any => "*",
        };
        f.write_str(s)
    }
}
