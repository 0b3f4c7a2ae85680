use std::collections::HashMap;
use std::time::Instant;

/// Observer for transcription progress and batch timings.
///
/// Keeps the use case free of any particular output mechanism; the CLI logs
/// through the `log` crate while tests discard everything.
pub trait TranscriptionLogger: Send {
    /// Report chunk-level progress after a batch completes.
    fn progress(&mut self, chunks_done: usize, chunks_total: usize);

    /// Record how long a named stage took (e.g. "load", "inference").
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullTranscriptionLogger;

impl TranscriptionLogger for NullTranscriptionLogger {
    fn progress(&mut self, _chunks_done: usize, _chunks_total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger: progress lines through `log::info!`, per-stage
/// timings collected for a summary at the end of the run.
///
/// Progress is reported at most once per `throttle_chunks` chunks, plus
/// always on the final chunk.
pub struct StdoutTranscriptionLogger {
    throttle_chunks: usize,
    last_reported: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    total_chunks: usize,
}

impl StdoutTranscriptionLogger {
    pub fn new(throttle_chunks: usize) -> Self {
        Self {
            throttle_chunks: throttle_chunks.max(1),
            last_reported: 0,
            timings: HashMap::new(),
            start_time: Instant::now(),
            total_chunks: 0,
        }
    }

    /// Returns the formatted summary, or `None` if nothing was timed.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Transcription summary ({} chunks, {elapsed_s:.1}s total):",
            self.total_chunks
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            lines.push(format!(
                "  {stage:10}: {} calls, avg {avg_ms:8.1}ms  total {total_ms:9.0}ms",
                durations.len()
            ));
        }

        if self.total_chunks > 0 && elapsed_s > 0.0 {
            let rate = self.total_chunks as f64 / elapsed_s;
            lines.push(format!("  Throughput: {rate:.2} chunks/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }
}

impl Default for StdoutTranscriptionLogger {
    fn default() -> Self {
        Self::new(8)
    }
}

impl TranscriptionLogger for StdoutTranscriptionLogger {
    fn progress(&mut self, chunks_done: usize, chunks_total: usize) {
        self.total_chunks = chunks_total;
        let due = chunks_done - self.last_reported.min(chunks_done) >= self.throttle_chunks;
        if chunks_total > 0 && (due || chunks_done == chunks_total) {
            self.last_reported = chunks_done;
            let pct = chunks_done as f64 / chunks_total as f64 * 100.0;
            log::info!("Processing: {chunks_done}/{chunks_total} chunks ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullTranscriptionLogger;
        logger.progress(1, 10);
        logger.timing("inference", 5.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutTranscriptionLogger::new(8);
        logger.timing("inference", 20.0);
        logger.timing("inference", 30.0);
        logger.timing("load", 5.0);

        assert_eq!(logger.timings_for("inference").unwrap(), &[20.0, 30.0]);
        assert_eq!(logger.timings_for("load").unwrap(), &[5.0]);
        assert!(logger.timings_for("missing").is_none());
    }

    #[test]
    fn test_summary_lists_stages_and_throughput() {
        let mut logger = StdoutTranscriptionLogger::new(8);
        logger.progress(3, 3);
        logger.timing("inference", 10.0);
        logger.timing("load", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Transcription summary (3 chunks"));
        assert!(summary.contains("inference"));
        assert!(summary.contains("load"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let mut logger = StdoutTranscriptionLogger::default();
        logger.info("status messages are logged, not collected");
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_throttled() {
        let mut logger = StdoutTranscriptionLogger::new(4);
        logger.progress(2, 10);
        assert_eq!(logger.last_reported, 0);
        logger.progress(4, 10);
        assert_eq!(logger.last_reported, 4);
        logger.progress(6, 10);
        assert_eq!(logger.last_reported, 4);
        logger.progress(10, 10);
        assert_eq!(logger.last_reported, 10);
        assert_eq!(logger.total_chunks, 10);
    }
}
