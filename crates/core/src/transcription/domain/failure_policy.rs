use serde::{Deserialize, Serialize};

/// What the orchestrator does when a batch fails inference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Discard everything and return the error.
    #[default]
    Abort,
    /// Stop at the failing batch and return what was transcribed so far,
    /// marked as truncated.
    BestEffort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_abort() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Abort);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&FailurePolicy::BestEffort).unwrap(),
            "\"best-effort\""
        );
        let p: FailurePolicy = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(p, FailurePolicy::Abort);
    }
}
