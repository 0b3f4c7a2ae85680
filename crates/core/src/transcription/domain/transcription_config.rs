use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CHUNK_LENGTH_SECONDS, DEFAULT_OVERLAP_SECONDS, SAMPLE_RATE,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("chunk length must be positive, got {0}s")]
    NonPositiveChunkLength(f64),
    #[error("overlap must be non-negative, got {0}s")]
    NegativeOverlap(f64),
    #[error("overlap ({overlap}s) must be shorter than the chunk length ({chunk}s)")]
    OverlapNotShorterThanChunk { overlap: f64, chunk: f64 },
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("sample rate must be positive")]
    ZeroSampleRate,
    #[error("audio is sampled at {actual} Hz but {expected} Hz is required")]
    SampleRateMismatch { expected: u32, actual: u32 },
    #[error("chunk of {chunk_samples} samples with {overlap_samples} overlap leaves no stride")]
    ZeroStride {
        chunk_samples: usize,
        overlap_samples: usize,
    },
}

/// Windowing and batching parameters, validated at construction.
///
/// Lengths are stored in samples; the seconds-based constructor rounds to the
/// nearest sample at `sample_rate`.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptionConfig {
    chunk_length_samples: usize,
    overlap_samples: usize,
    batch_size: usize,
    sample_rate: u32,
}

impl TranscriptionConfig {
    pub fn new(
        chunk_length_seconds: f64,
        overlap_seconds: f64,
        batch_size: usize,
        sample_rate: u32,
    ) -> Result<Self, ConfigurationError> {
        if !chunk_length_seconds.is_finite() || chunk_length_seconds <= 0.0 {
            return Err(ConfigurationError::NonPositiveChunkLength(
                chunk_length_seconds,
            ));
        }
        if !overlap_seconds.is_finite() || overlap_seconds < 0.0 {
            return Err(ConfigurationError::NegativeOverlap(overlap_seconds));
        }
        if overlap_seconds >= chunk_length_seconds {
            return Err(ConfigurationError::OverlapNotShorterThanChunk {
                overlap: overlap_seconds,
                chunk: chunk_length_seconds,
            });
        }
        if sample_rate == 0 {
            return Err(ConfigurationError::ZeroSampleRate);
        }

        let rate = sample_rate as f64;
        let chunk_samples = (chunk_length_seconds * rate).round() as usize;
        let overlap_samples = (overlap_seconds * rate).round() as usize;
        Self::from_samples(chunk_samples, overlap_samples, batch_size, sample_rate)
    }

    pub fn from_samples(
        chunk_length_samples: usize,
        overlap_samples: usize,
        batch_size: usize,
        sample_rate: u32,
    ) -> Result<Self, ConfigurationError> {
        if sample_rate == 0 {
            return Err(ConfigurationError::ZeroSampleRate);
        }
        if batch_size == 0 {
            return Err(ConfigurationError::ZeroBatchSize);
        }
        if chunk_length_samples <= overlap_samples {
            return Err(ConfigurationError::ZeroStride {
                chunk_samples: chunk_length_samples,
                overlap_samples,
            });
        }
        Ok(Self {
            chunk_length_samples,
            overlap_samples,
            batch_size,
            sample_rate,
        })
    }

    pub fn chunk_length_samples(&self) -> usize {
        self.chunk_length_samples
    }

    pub fn overlap_samples(&self) -> usize {
        self.overlap_samples
    }

    pub fn stride(&self) -> usize {
        self.chunk_length_samples - self.overlap_samples
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn chunk_length_seconds(&self) -> f64 {
        self.chunk_length_samples as f64 / self.sample_rate as f64
    }

    pub fn overlap_seconds(&self) -> f64 {
        self.overlap_samples as f64 / self.sample_rate as f64
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        let rate = SAMPLE_RATE as usize;
        Self {
            chunk_length_samples: DEFAULT_CHUNK_LENGTH_SECONDS as usize * rate,
            overlap_samples: DEFAULT_OVERLAP_SECONDS as usize * rate,
            batch_size: DEFAULT_BATCH_SIZE,
            sample_rate: SAMPLE_RATE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_seconds_are_converted_to_samples() {
        let config = TranscriptionConfig::new(30.0, 2.0, 8, 16000).unwrap();
        assert_eq!(config.chunk_length_samples(), 480_000);
        assert_eq!(config.overlap_samples(), 32_000);
        assert_eq!(config.stride(), 448_000);
        assert_eq!(config.batch_size(), 8);
    }

    #[test]
    fn test_fractional_seconds_round_to_nearest_sample() {
        let config = TranscriptionConfig::new(0.00106, 0.0, 1, 1000).unwrap();
        assert_eq!(config.chunk_length_samples(), 1);
    }

    #[test]
    fn test_default_matches_seconds_constructor() {
        let from_seconds = TranscriptionConfig::new(
            DEFAULT_CHUNK_LENGTH_SECONDS,
            DEFAULT_OVERLAP_SECONDS,
            DEFAULT_BATCH_SIZE,
            SAMPLE_RATE,
        )
        .unwrap();
        assert_eq!(TranscriptionConfig::default(), from_seconds);
    }

    #[test]
    fn test_seconds_accessors() {
        let config = TranscriptionConfig::new(1.5, 0.25, 2, 16000).unwrap();
        assert_relative_eq!(config.chunk_length_seconds(), 1.5);
        assert_relative_eq!(config.overlap_seconds(), 0.25);
    }

    #[rstest]
    #[case::zero_chunk(0.0, 0.0, 1, 16000)]
    #[case::negative_chunk(-1.0, 0.0, 1, 16000)]
    #[case::nan_chunk(f64::NAN, 0.0, 1, 16000)]
    #[case::negative_overlap(10.0, -0.5, 1, 16000)]
    #[case::overlap_equals_chunk(10.0, 10.0, 1, 16000)]
    #[case::overlap_exceeds_chunk(10.0, 12.0, 1, 16000)]
    #[case::zero_batch(10.0, 1.0, 0, 16000)]
    #[case::zero_rate(10.0, 1.0, 1, 0)]
    fn test_invalid_parameters_rejected(
        #[case] chunk: f64,
        #[case] overlap: f64,
        #[case] batch: usize,
        #[case] rate: u32,
    ) {
        assert!(TranscriptionConfig::new(chunk, overlap, batch, rate).is_err());
    }

    #[test]
    fn test_overlap_error_kind() {
        let err = TranscriptionConfig::new(5.0, 5.0, 1, 16000).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::OverlapNotShorterThanChunk {
                overlap: 5.0,
                chunk: 5.0
            }
        );
    }

    #[test]
    fn test_rounding_that_collapses_stride_is_rejected() {
        // 1.0004s vs 1.0s at 1 kHz both round to 1000 samples.
        let err = TranscriptionConfig::new(1.0004, 1.0, 1, 1000).unwrap_err();
        assert!(matches!(err, ConfigurationError::ZeroStride { .. }));
    }

    #[test]
    fn test_from_samples_rejects_zero_stride() {
        let err = TranscriptionConfig::from_samples(10, 10, 1, 16000).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ZeroStride {
                chunk_samples: 10,
                overlap_samples: 10
            }
        );
    }
}
