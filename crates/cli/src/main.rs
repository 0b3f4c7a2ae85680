use std::path::PathBuf;
use std::process;

use clap::Parser;

use transcribe_core::audio::infrastructure::ffmpeg_audio_loader::FfmpegAudioLoader;
use transcribe_core::pipeline::transcribe_audio_use_case::TranscribeAudioUseCase;
use transcribe_core::pipeline::transcription_logger::StdoutTranscriptionLogger;
use transcribe_core::shared::constants::{SAMPLE_RATE, WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use transcribe_core::shared::device::Device;
use transcribe_core::shared::model_resolver;
use transcribe_core::shared::settings::Settings;
use transcribe_core::transcription::domain::batch_recognizer::BatchRecognizer;
use transcribe_core::transcription::domain::decode_options::DecodeOptions;
use transcribe_core::transcription::domain::failure_policy::FailurePolicy;
use transcribe_core::transcription::domain::transcription_config::TranscriptionConfig;
use transcribe_core::transcription::infrastructure::retrying_recognizer::RetryingRecognizer;
use transcribe_core::transcription::infrastructure::whisper_batch_recognizer::{
    default_thread_count, WhisperBatchRecognizer,
};

/// Transcribe long audio files with Whisper.
#[derive(Parser)]
#[command(name = "transcribe")]
struct Cli {
    /// Input audio (or video) file.
    input: PathBuf,

    /// Write the transcript here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Whisper ggml model file (downloaded to the cache if omitted).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chunk length in seconds.
    #[arg(long)]
    chunk_length: Option<f64>,

    /// Overlap between consecutive chunks in seconds.
    #[arg(long)]
    overlap: Option<f64>,

    /// Chunks per inference call.
    #[arg(long)]
    batch_size: Option<usize>,

    /// Language hint passed to the model (e.g. en, de).
    #[arg(long)]
    language: Option<String>,

    /// Inference device: cpu or gpu.
    #[arg(long)]
    device: Option<Device>,

    /// Inference threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Retry a failed batch up to N more times.
    #[arg(long)]
    retries: Option<usize>,

    /// Return a partial transcript instead of failing when a batch errors.
    #[arg(long)]
    best_effort: bool,

    /// Write the effective settings back to the settings file.
    #[arg(long)]
    save_config: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;
    let settings = merge_settings(&cli, load_settings(&cli)?);
    if cli.save_config {
        let path = settings_path(&cli).ok_or("No config directory; pass --config")?;
        settings.save_to(&path)?;
        log::info!("Settings saved to {}", path.display());
    }

    let config = TranscriptionConfig::new(
        settings.chunk_length_seconds,
        settings.overlap_seconds,
        settings.batch_size,
        SAMPLE_RATE,
    )?;
    let options = DecodeOptions {
        language: settings.language.clone(),
        ..DecodeOptions::default()
    };
    let recognizer = build_recognizer(&settings)?;

    let mut use_case =
        TranscribeAudioUseCase::new(Box::new(FfmpegAudioLoader), recognizer, config)
            .with_options(options)
            .with_failure_policy(settings.failure_policy)
            .with_logger(Box::new(StdoutTranscriptionLogger::default()));

    match cli.output {
        Some(ref output) => {
            let transcript = use_case.transcribe_to_file(&cli.input, output)?;
            if transcript.is_truncated() {
                log::warn!("Transcript is incomplete");
            }
        }
        None => {
            let transcript = use_case.transcribe_audio(&cli.input)?;
            println!("{transcript}");
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = match cli.config {
        Some(ref path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

fn settings_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(Settings::default_path)
}

/// Command-line flags take precedence over the settings file.
fn merge_settings(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(v) = cli.chunk_length {
        settings.chunk_length_seconds = v;
    }
    if let Some(v) = cli.overlap {
        settings.overlap_seconds = v;
    }
    if let Some(v) = cli.batch_size {
        settings.batch_size = v;
    }
    if let Some(ref v) = cli.language {
        settings.language = Some(v.clone());
    }
    if let Some(v) = cli.device {
        settings.device = v;
    }
    if let Some(v) = cli.threads {
        settings.threads = Some(v);
    }
    if let Some(v) = cli.retries {
        settings.retries = v;
    }
    if cli.best_effort {
        settings.failure_policy = FailurePolicy::BestEffort;
    }
    if let Some(ref v) = cli.model {
        settings.model_path = Some(v.clone());
    }
    settings
}

fn build_recognizer(
    settings: &Settings,
) -> Result<Box<dyn BatchRecognizer>, Box<dyn std::error::Error>> {
    let model_path = match settings.model_path {
        Some(ref path) => path.clone(),
        None => {
            log::info!("Resolving model: {WHISPER_MODEL_NAME}");
            let path = model_resolver::resolve(
                WHISPER_MODEL_NAME,
                WHISPER_MODEL_URL,
                None,
                Some(Box::new(download_progress)),
            )?;
            eprintln!();
            path
        }
    };

    let threads = settings.threads.unwrap_or_else(default_thread_count);
    let base: Box<dyn BatchRecognizer> = Box::new(WhisperBatchRecognizer::new(
        &model_path,
        settings.device,
        threads,
    )?);

    if settings.retries > 0 {
        Ok(Box::new(RetryingRecognizer::new(base, max_attempts(settings.retries))?))
    } else {
        Ok(base)
    }
}

/// One initial attempt plus `retries`.
fn max_attempts(retries: usize) -> usize {
    retries.saturating_add(1)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if let Some(ref model) = cli.model {
        if !model.exists() {
            return Err(format!("Model file not found: {}", model.display()).into());
        }
    }
    if cli.threads == Some(0) {
        return Err("Threads must be at least 1".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
