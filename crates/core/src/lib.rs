//! Chunked long-audio transcription.
//!
//! Audio is decoded to a mono waveform, split lazily into overlapping
//! windows, and fed batch by batch to a [`BatchRecognizer`]. Per-chunk text
//! is joined in order into a single [`Transcript`].
//!
//! [`BatchRecognizer`]: transcription::domain::batch_recognizer::BatchRecognizer
//! [`Transcript`]: transcription::domain::transcript::Transcript

pub mod audio {
    pub mod domain {
        pub mod audio_loader;
        pub mod waveform;
    }
    pub mod infrastructure;
}

pub mod transcription {
    pub mod domain {
        pub mod batch_recognizer;
        pub mod chunk;
        pub mod decode_options;
        pub mod failure_policy;
        pub mod transcript;
        pub mod transcription_config;
        pub mod transcription_error;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod transcribe_audio_use_case;
    pub mod transcription_logger;
}

pub mod shared {
    pub mod constants;
    pub mod device;
    pub mod model_resolver;
    pub mod settings;
}
