use std::path::{Path, PathBuf};

use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use crate::shared::device::Device;
use crate::transcription::domain::batch_recognizer::{BatchRecognizer, InferenceError};
use crate::transcription::domain::chunk::Chunk;
use crate::transcription::domain::decode_options::DecodeOptions;

/// Batched speech recognizer using whisper.cpp via whisper-rs.
///
/// The model is loaded once. A decoding state is created on the first chunk
/// of a batch, reused for the rest of it, and dropped by `release_resources`.
pub struct WhisperBatchRecognizer {
    model_path: PathBuf,
    ctx: WhisperContext,
    n_threads: usize,
    state: Option<WhisperState>,
}

impl WhisperBatchRecognizer {
    pub fn new(model_path: &Path, device: Device, n_threads: usize) -> Result<Self, InferenceError> {
        ensure_device_supported(device)?;
        if !model_path.exists() {
            return Err(InferenceError::ModelLoad {
                message: format!("Whisper model not found at: {}", model_path.display()),
            });
        }
        let path_str = model_path.to_str().ok_or_else(|| InferenceError::ModelLoad {
            message: format!("invalid model path: {}", model_path.display()),
        })?;

        log::info!("Loading Whisper model {} on {device}", model_path.display());
        let mut params = WhisperContextParameters::default();
        params.use_gpu(device == Device::Gpu);
        let ctx = WhisperContext::new_with_params(path_str, params).map_err(|e| {
            InferenceError::ModelLoad {
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            model_path: model_path.to_path_buf(),
            ctx,
            n_threads: n_threads.max(1),
            state: None,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn transcribe_chunk(
        &mut self,
        chunk: &Chunk,
        options: &DecodeOptions,
    ) -> Result<String, InferenceError> {
        if self.state.is_none() {
            let created = self
                .ctx
                .create_state()
                .map_err(|e| InferenceError::backend(format!("failed to create state: {e}")))?;
            self.state = Some(created);
        }
        let n_threads = self.n_threads as i32;
        let Some(state) = self.state.as_mut() else {
            return Err(InferenceError::backend("decoding state unavailable"));
        };

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(options.language.as_deref());
        params.set_translate(options.get("translate") == Some("true"));
        if let Some(prompt) = options.get("initial_prompt") {
            params.set_initial_prompt(prompt);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(n_threads);

        state
            .full(params, chunk.samples())
            .map_err(|e| InferenceError::backend(format!("Whisper inference failed: {e}")))?;

        let mut segments = Vec::new();
        for seg_idx in 0..state.full_n_segments() {
            if let Some(segment) = state.get_segment(seg_idx) {
                let text = segment.to_str_lossy().map_err(|e| {
                    InferenceError::backend(format!("unreadable segment {seg_idx}: {e}"))
                })?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    segments.push(trimmed.to_string());
                }
            }
        }

        Ok(segments.join(" "))
    }
}

impl BatchRecognizer for WhisperBatchRecognizer {
    fn transcribe_batch(
        &mut self,
        chunks: &[Chunk],
        options: &DecodeOptions,
    ) -> Result<Vec<String>, InferenceError> {
        log::debug!("Transcribing batch of {} chunks", chunks.len());
        let result: Result<Vec<String>, InferenceError> = chunks
            .iter()
            .map(|chunk| self.transcribe_chunk(chunk, options))
            .collect();
        if result.is_err() {
            self.release_resources();
        }
        result
    }

    fn release_resources(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Released Whisper decoding state");
        }
    }
}

/// Whether this build links a GPU backend for whisper.cpp.
pub const GPU_BACKEND_COMPILED: bool =
    cfg!(any(feature = "cuda", feature = "metal", feature = "vulkan"));

/// Reject `Device::Gpu` when no GPU backend feature was compiled in, instead
/// of silently decoding on the CPU.
pub fn ensure_device_supported(device: Device) -> Result<(), InferenceError> {
    if device == Device::Gpu && !GPU_BACKEND_COMPILED {
        return Err(InferenceError::ModelLoad {
            message: "GPU requested but this build has no GPU backend; \
                      rebuild with the `cuda`, `metal` or `vulkan` feature"
                .to_string(),
        });
    }
    Ok(())
}

/// Default inference thread count: available cores, capped at 4.
pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4)
}
