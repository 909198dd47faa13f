use rand::Rng;

/// Decorative waveform drawn behind the timeline. The bars are random and say
/// nothing about the actual audio.
pub struct WaveformData {
    pub peaks: Vec<f32>,
    pub duration: f64,
}

impl WaveformData {
    pub const BAR_COUNT: usize = 200;

    pub fn illustrative(duration: f64) -> Self {
        let mut rng = rand::rng();
        let peaks = (0..Self::BAR_COUNT)
            .map(|_| rng.random_range(0.25..0.75))
            .collect();

        WaveformData { peaks, duration }
    }

    /// Whether this waveform was generated for the given media duration.
    pub fn matches_duration(&self, duration: f64) -> bool {
        self.duration == duration
    }
}
