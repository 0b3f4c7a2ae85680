pub const WHISPER_MODEL_NAME: &str = "ggml-large-v3-turbo.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-large-v3-turbo.bin";

/// Input rate expected by Whisper models.
pub const SAMPLE_RATE: u32 = 16000;

pub const DEFAULT_CHUNK_LENGTH_SECONDS: f64 = 30.0;
pub const DEFAULT_OVERLAP_SECONDS: f64 = 2.0;
/// Chunks per inference call; lower this on memory-constrained devices.
pub const DEFAULT_BATCH_SIZE: usize = 8;
pub const DEFAULT_LANGUAGE: &str = "en";
