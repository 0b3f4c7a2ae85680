use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::audio::domain::audio_loader::AudioLoader;
use crate::audio::domain::waveform::Waveform;
use crate::pipeline::transcription_logger::{NullTranscriptionLogger, TranscriptionLogger};
use crate::transcription::domain::batch_recognizer::{BatchRecognizer, InferenceError};
use crate::transcription::domain::chunk::{Chunk, Chunker};
use crate::transcription::domain::decode_options::DecodeOptions;
use crate::transcription::domain::failure_policy::FailurePolicy;
use crate::transcription::domain::transcript::Transcript;
use crate::transcription::domain::transcription_config::{
    ConfigurationError, TranscriptionConfig,
};
use crate::transcription::domain::transcription_error::TranscriptionError;

/// Transcribes long audio: load → chunk lazily → batch → recognize → join.
///
/// Batches run strictly one after another. At most one batch of chunks is
/// alive at a time, and the recognizer is asked to release its per-batch
/// resources before the next batch is assembled.
pub struct TranscribeAudioUseCase {
    loader: Box<dyn AudioLoader>,
    recognizer: Box<dyn BatchRecognizer>,
    config: TranscriptionConfig,
    options: DecodeOptions,
    failure_policy: FailurePolicy,
    logger: Box<dyn TranscriptionLogger>,
}

impl TranscribeAudioUseCase {
    pub fn new(
        loader: Box<dyn AudioLoader>,
        recognizer: Box<dyn BatchRecognizer>,
        config: TranscriptionConfig,
    ) -> Self {
        Self {
            loader,
            recognizer,
            config,
            options: DecodeOptions::default(),
            failure_policy: FailurePolicy::default(),
            logger: Box::new(NullTranscriptionLogger),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn TranscriptionLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    pub fn load_audio(&mut self, path: &Path) -> Result<Waveform, TranscriptionError> {
        let started = Instant::now();
        let waveform = self.loader.load(path, self.config.sample_rate())?;
        self.logger.timing("load", elapsed_ms(started));
        Ok(waveform)
    }

    /// Run one batch through the recognizer, checking it answered every chunk.
    pub fn transcribe_batch(&mut self, chunks: &[Chunk]) -> Result<Vec<String>, InferenceError> {
        let started = Instant::now();
        let fragments = self.recognizer.transcribe_batch(chunks, &self.options)?;
        self.logger.timing("inference", elapsed_ms(started));
        if fragments.len() != chunks.len() {
            return Err(InferenceError::FragmentCountMismatch {
                expected: chunks.len(),
                actual: fragments.len(),
            });
        }
        Ok(fragments)
    }

    pub fn transcribe_audio(&mut self, path: &Path) -> Result<Transcript, TranscriptionError> {
        let waveform = self.load_audio(path)?;
        let transcript = self.transcribe_waveform(&waveform)?;
        self.logger.summary();
        Ok(transcript)
    }

    /// Transcribe `input` and write the rendered transcript to `output`.
    pub fn transcribe_to_file(
        &mut self,
        input: &Path,
        output: &Path,
    ) -> Result<Transcript, TranscriptionError> {
        let transcript = self.transcribe_audio(input)?;
        let output_err = |e| TranscriptionError::Output {
            path: output.to_path_buf(),
            source: e,
        };
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(output_err)?;
        }
        fs::write(output, transcript.to_string()).map_err(output_err)?;
        self.logger
            .info(&format!("Transcript written to {}", output.display()));
        Ok(transcript)
    }

    /// Transcribe an already-decoded waveform at the configured sample rate.
    pub fn transcribe_waveform(
        &mut self,
        waveform: &Waveform,
    ) -> Result<Transcript, TranscriptionError> {
        if waveform.sample_rate() != self.config.sample_rate() {
            return Err(ConfigurationError::SampleRateMismatch {
                expected: self.config.sample_rate(),
                actual: waveform.sample_rate(),
            }
            .into());
        }

        let chunker = Chunker::new(&self.config);
        let batch_size = self.config.batch_size();
        let total_chunks = chunker.chunk_count(waveform.len());
        self.logger.info(&format!(
            "Transcribing {:.1}s of audio in {total_chunks} chunks (batch size {batch_size})",
            waveform.duration()
        ));

        let mut fragments: Vec<String> = Vec::with_capacity(total_chunks);
        let mut batch: Vec<Chunk> = Vec::with_capacity(batch_size);
        let mut batches_done = 0;

        for chunk in chunker.chunks(waveform) {
            batch.push(chunk);
            if batch.len() < batch_size {
                continue;
            }
            if let Err(e) = self.run_batch(&mut batch, &mut fragments, total_chunks) {
                return self.on_failure(e, batches_done, fragments);
            }
            batches_done += 1;
        }

        if !batch.is_empty() {
            if let Err(e) = self.run_batch(&mut batch, &mut fragments, total_chunks) {
                return self.on_failure(e, batches_done, fragments);
            }
            batches_done += 1;
        }

        self.logger.info("Transcription complete");
        Ok(Transcript::new(fragments, batches_done))
    }

    fn run_batch(
        &mut self,
        batch: &mut Vec<Chunk>,
        fragments: &mut Vec<String>,
        total_chunks: usize,
    ) -> Result<(), InferenceError> {
        let result = self.transcribe_batch(batch);
        batch.clear();
        self.recognizer.release_resources();
        fragments.extend(result?);
        self.logger.progress(fragments.len(), total_chunks);
        Ok(())
    }

    fn on_failure(
        &mut self,
        error: InferenceError,
        batch_index: usize,
        fragments: Vec<String>,
    ) -> Result<Transcript, TranscriptionError> {
        match self.failure_policy {
            FailurePolicy::Abort => {
                log::error!("Batch {batch_index} failed, aborting transcription: {error}");
                Err(TranscriptionError::Inference {
                    batch_index,
                    source: error,
                })
            }
            FailurePolicy::BestEffort => {
                log::warn!(
                    "Batch {batch_index} failed, returning {} fragments so far: {error}",
                    fragments.len()
                );
                Ok(Transcript::truncated(fragments, batch_index))
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
