use std::time::Duration;

use crate::transcription::domain::batch_recognizer::{BatchRecognizer, InferenceError};
use crate::transcription::domain::chunk::Chunk;
use crate::transcription::domain::decode_options::DecodeOptions;

pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Decorator that retries transient batch failures with exponential backoff.
///
/// Resources are released between attempts so a retry starts from a clean
/// backend. Non-transient errors are returned immediately.
pub struct RetryingRecognizer {
    inner: Box<dyn BatchRecognizer>,
    max_attempts: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryingRecognizer {
    pub fn new(inner: Box<dyn BatchRecognizer>, max_attempts: usize) -> Result<Self, &'static str> {
        if max_attempts < 1 {
            return Err("max_attempts must be >= 1");
        }
        Ok(Self {
            inner,
            max_attempts,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        })
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max.max(initial);
        self
    }

    /// Delay before retry number `retry` (0-based).
    pub fn backoff_for(&self, retry: usize) -> Duration {
        let factor = 1u32.checked_shl(retry.min(31) as u32).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl BatchRecognizer for RetryingRecognizer {
    fn transcribe_batch(
        &mut self,
        chunks: &[Chunk],
        options: &DecodeOptions,
    ) -> Result<Vec<String>, InferenceError> {
        let mut attempt = 1;
        loop {
            match self.inner.transcribe_batch(chunks, options) {
                Ok(fragments) => return Ok(fragments),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff_for(attempt - 1);
                    log::warn!(
                        "Batch attempt {attempt}/{} failed: {e}; retrying in {delay:?}",
                        self.max_attempts
                    );
                    self.inner.release_resources();
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn release_resources(&mut self) {
        self.inner.release_resources();
    }
}
