use std::iter::FusedIterator;

use crate::audio::domain::waveform::Waveform;
use crate::transcription::domain::transcription_config::TranscriptionConfig;

/// A window of the parent waveform, identified by its start offset.
///
/// Samples are copied out of the waveform so a chunk can outlive the borrow
/// that produced it while it waits in a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    start: usize,
    samples: Vec<f32>,
}

impl Chunk {
    pub fn new(start: usize, samples: Vec<f32>) -> Self {
        Self { start, samples }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset within the parent waveform.
    pub fn end(&self) -> usize {
        self.start + self.samples.len()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Splits waveforms into overlapping fixed-length windows.
#[derive(Clone, Copy, Debug)]
pub struct Chunker {
    chunk_length: usize,
    overlap: usize,
}

impl Chunker {
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            chunk_length: config.chunk_length_samples(),
            overlap: config.overlap_samples(),
        }
    }

    fn stride(&self) -> usize {
        self.chunk_length - self.overlap
    }

    /// Lazily walk `waveform` from offset 0. Each call starts a fresh pass.
    pub fn chunks<'a>(&self, waveform: &'a Waveform) -> ChunkIter<'a> {
        ChunkIter {
            samples: waveform.samples(),
            chunk_length: self.chunk_length,
            stride: self.stride(),
            next_start: Some(0).filter(|_| !waveform.is_empty()),
        }
    }

    /// Number of chunks `chunks` yields for a waveform of `len` samples.
    pub fn chunk_count(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else if len <= self.chunk_length {
            1
        } else {
            (len - self.overlap).div_ceil(self.stride())
        }
    }
}

/// Lazy chunk sequence over one waveform. Not rewindable.
pub struct ChunkIter<'a> {
    samples: &'a [f32],
    chunk_length: usize,
    stride: usize,
    next_start: Option<usize>,
}

impl Iterator for ChunkIter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let start = self.next_start?;
        let end = (start + self.chunk_length).min(self.samples.len());
        self.next_start = if end == self.samples.len() {
            None
        } else {
            Some(start + self.stride)
        };
        Some(Chunk::new(start, self.samples[start..end].to_vec()))
    }
}

impl FusedIterator for ChunkIter<'_> {}
