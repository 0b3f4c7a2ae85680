use std::fmt;

pub const TRUNCATION_MARKER: &str = "[transcript truncated]";

/// Ordered per-chunk fragments of one transcription run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
    fragments: Vec<String>,
    batches: usize,
    truncated: bool,
}

impl Transcript {
    pub fn new(fragments: Vec<String>, batches: usize) -> Self {
        Self {
            fragments,
            batches,
            truncated: false,
        }
    }

    /// A transcript that stopped early; rendered with a trailing marker.
    pub fn truncated(fragments: Vec<String>, batches: usize) -> Self {
        Self {
            fragments,
            batches,
            truncated: true,
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn chunk_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Fragments joined with a single space, without any truncation marker.
    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())?;
        if self.truncated {
            if !self.fragments.is_empty() {
                f.write_str(" ")?;
            }
            f.write_str(TRUNCATION_MARKER)?;
        }
        Ok(())
    }
}
