use std::path::{Path, PathBuf};

use thiserror::Error;

use super::waveform::Waveform;

#[derive(Error, Debug)]
pub enum AudioLoadError {
    #[error("audio file not found: {0}")]
    NotFound(PathBuf),
    #[error("no audio track in {0}")]
    NoAudioTrack(PathBuf),
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Domain interface for decoding an audio (or audio-bearing video) file.
pub trait AudioLoader: Send {
    /// Decode the file to a mono waveform resampled to `target_sample_rate`.
    fn load(&self, path: &Path, target_sample_rate: u32) -> Result<Waveform, AudioLoadError>;
}
