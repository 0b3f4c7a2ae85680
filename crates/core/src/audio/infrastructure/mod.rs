pub mod ffmpeg_audio_loader;
