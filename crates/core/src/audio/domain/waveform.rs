/// Decoded mono PCM audio: samples normalized to [-1.0, 1.0] at a fixed rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_keeps_samples_and_rate() {
        let samples = vec![0.25f32; 16000];
        let wf = Waveform::new(samples.clone(), 16000);
        assert_eq!(wf.samples(), &samples[..]);
        assert_eq!(wf.sample_rate(), 16000);
        assert_eq!(wf.len(), 16000);
    }

    #[test]
    fn test_duration() {
        let wf = Waveform::new(vec![0.0; 40000], 16000);
        assert_relative_eq!(wf.duration(), 2.5);
    }

    #[test]
    fn test_empty() {
        let wf = Waveform::new(Vec::new(), 16000);
        assert!(wf.is_empty());
        assert_eq!(wf.duration(), 0.0);
    }
}
