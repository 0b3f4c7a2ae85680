use std::path::PathBuf;

use thiserror::Error;

use crate::audio::domain::audio_loader::AudioLoadError;
use crate::transcription::domain::batch_recognizer::InferenceError;
use crate::transcription::domain::transcription_config::ConfigurationError;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error(transparent)]
    AudioLoad(#[from] AudioLoadError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("batch {batch_index} failed: {source}")]
    Inference {
        batch_index: usize,
        #[source]
        source: InferenceError,
    },
    #[error("failed to write transcript to {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscriptionError {
    pub fn inference_error(&self) -> Option<&InferenceError> {
        match self {
            TranscriptionError::Inference { source, .. } => Some(source),
            _ => None,
        }
    }
}
