use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::shared::constants::DEFAULT_LANGUAGE;

/// Decoding hints handed to the recognizer with every batch.
///
/// `extra` is opaque to the orchestrator; backends pick out the keys they
/// understand and ignore the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub language: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl DecodeOptions {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            language: Some(DEFAULT_LANGUAGE.to_string()),
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(DecodeOptions::default().language.as_deref(), Some("en"));
    }

    #[test]
    fn test_builder_sets_values() {
        let opts = DecodeOptions::default()
            .with_language("de")
            .with_option("translate", "true");
        assert_eq!(opts.language.as_deref(), Some("de"));
        assert_eq!(opts.get("translate"), Some("true"));
        assert_eq!(opts.get("missing"), None);
    }

    #[test]
    fn test_extra_defaults_when_absent_from_json() {
        let opts: DecodeOptions = serde_json::from_str(r#"{"language":"fr"}"#).unwrap();
        assert_eq!(opts.language.as_deref(), Some("fr"));
        assert!(opts.extra.is_empty());
    }
}
