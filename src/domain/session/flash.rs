use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One-shot messages stored in the session until read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashMessages(BTreeMap<String, Vec<String>>);

impl FlashMessages {
    pub fn push(&mut self, kind: impl Into<String>, message: impl Into<String>) {
        self.0.entry(kind.into()).or_default().push(message.into());
    }

    /// Remove and return the messages of one kind.
    pub fn take(&mut self, kind: &str) -> Vec<String> {
        self.0.remove(kind).unwrap_or_default()
    }

    /// Remove and return every message.
    pub fn take_all(&mut self) -> BTreeMap<String, Vec<String>> {
        std::mem::take(&mut self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_messages() {
        let mut flash = FlashMessages::default();
        flash.push("error", "Invalid email");
        flash.push("error", "Missing name");
        flash.push("info", "Saved");

        assert_eq!(flash.take("error"), vec!["Invalid email", "Missing name"]);
        assert!(flash.take("error").is_empty());
        assert!(!flash.is_empty());

        let rest = flash.take_all();
        assert_eq!(rest.get("info"), Some(&vec!["Saved".to_string()]));
        assert!(flash.is_empty());
    }
}
