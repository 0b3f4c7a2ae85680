use std::path::Path;

use crate::audio::domain::audio_loader::{AudioLoadError, AudioLoader};
use crate::audio::domain::waveform::Waveform;

/// Decodes audio with ffmpeg-next, downmixing to mono f32 at the target rate.
pub struct FfmpegAudioLoader;

impl AudioLoader for FfmpegAudioLoader {
    fn load(&self, path: &Path, target_sample_rate: u32) -> Result<Waveform, AudioLoadError> {
        if !path.exists() {
            return Err(AudioLoadError::NotFound(path.to_path_buf()));
        }
        log::info!("Loading audio file: {}", path.display());

        let samples = decode(path, target_sample_rate).map_err(|e| match e {
            DecodeFailure::NoAudioTrack => AudioLoadError::NoAudioTrack(path.to_path_buf()),
            DecodeFailure::Ffmpeg(err) => AudioLoadError::Decode {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        })?;

        let waveform = Waveform::new(samples, target_sample_rate);
        log::info!(
            "Audio loaded: {} samples at {} Hz ({:.1}s)",
            waveform.len(),
            target_sample_rate,
            waveform.duration()
        );
        Ok(waveform)
    }
}

enum DecodeFailure {
    NoAudioTrack,
    Ffmpeg(ffmpeg_next::Error),
}

impl From<ffmpeg_next::Error> for DecodeFailure {
    fn from(e: ffmpeg_next::Error) -> Self {
        DecodeFailure::Ffmpeg(e)
    }
}

fn decode(path: &Path, target_sample_rate: u32) -> Result<Vec<f32>, DecodeFailure> {
    ffmpeg_next::init()?;

    let mut ictx = ffmpeg_next::format::input(path)?;

    let audio_stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .ok_or(DecodeFailure::NoAudioTrack)?;
    let audio_stream_index = audio_stream.index();

    let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
    let mut decoder = codec_ctx.decoder().audio()?;

    let mut resampler = ffmpeg_next::software::resampling::Context::get(
        decoder.format(),
        decoder.channel_layout(),
        decoder.rate(),
        ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Planar),
        ffmpeg_next::ChannelLayout::MONO,
        target_sample_rate,
    )?;

    let mut samples: Vec<f32> = Vec::new();
    let mut decoded = ffmpeg_next::util::frame::audio::Audio::empty();
    let mut resampled = ffmpeg_next::util::frame::audio::Audio::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() != audio_stream_index {
            continue;
        }

        decoder.send_packet(&packet)?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            resampler.run(&decoded, &mut resampled)?;
            extract_f32_samples(&resampled, &mut samples);
        }
    }

    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded).is_ok() {
        resampler.run(&decoded, &mut resampled)?;
        extract_f32_samples(&resampled, &mut samples);
    }

    // The resampler may still hold buffered samples.
    if let Ok(Some(delay)) = resampler.flush(&mut resampled) {
        if delay.output > 0 {
            extract_f32_samples(&resampled, &mut samples);
        }
    }

    Ok(samples)
}

/// Extract f32 samples from a planar mono resampled frame.
fn extract_f32_samples(frame: &ffmpeg_next::util::frame::audio::Audio, out: &mut Vec<f32>) {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return;
    }
    let data = frame.data(0);
    let floats = unsafe { std::slice::from_raw_parts(data.as_ptr() as *const f32, num_samples) };
    out.extend_from_slice(floats);
}
