use thiserror::Error;

use super::chunk::Chunk;
use super::decode_options::DecodeOptions;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("failed to load speech model: {message}")]
    ModelLoad { message: String },
    #[error("inference failed: {message}")]
    Backend { message: String },
    #[error("recognizer returned {actual} fragments for {expected} chunks")]
    FragmentCountMismatch { expected: usize, actual: usize },
}

impl InferenceError {
    pub fn backend(message: impl Into<String>) -> Self {
        InferenceError::Backend {
            message: message.into(),
        }
    }

    /// Whether running the same batch again could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, InferenceError::Backend { .. })
    }
}

/// Domain interface for batched speech-to-text inference.
///
/// Implementations return exactly one text fragment per input chunk, in
/// input order. `&mut self` allows backends to hold per-batch state.
pub trait BatchRecognizer: Send {
    fn transcribe_batch(
        &mut self,
        chunks: &[Chunk],
        options: &DecodeOptions,
    ) -> Result<Vec<String>, InferenceError>;

    /// Drop any transient resources held for the previous batch.
    fn release_resources(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_backend_errors_are_transient() {
        assert!(InferenceError::backend("oom").is_transient());
        assert!(!InferenceError::ModelLoad {
            message: "x".into()
        }
        .is_transient());
        assert!(!InferenceError::FragmentCountMismatch {
            expected: 2,
            actual: 1
        }
        .is_transient());
    }

    #[test]
    fn test_mismatch_message() {
        let err = InferenceError::FragmentCountMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "recognizer returned 2 fragments for 3 chunks"
        );
    }
}
