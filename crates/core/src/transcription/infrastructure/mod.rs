pub mod retrying_recognizer;
pub mod whisper_batch_recognizer;
