//! RMS-based gain normalizer (spec §4.3).

use super::Processor;
use crate::error::ConfigError;

const DEFAULT_TARGET_LEVEL: f32 = 0.3;
const RMS_EPSILON: f32 = 1e-4;
const MIN_GAIN: f32 = 0.1;
const MAX_GAIN: f32 = 10.0;
const ATTACK_SECONDS: f32 = 0.1;
const RELEASE_SECONDS: f32 = 0.3;

pub struct GainNormalizer {
    target_level: f32,
    gain: f32,
    sample_rate: u32,
    channels: u16,
}

impl GainNormalizer {
    pub fn new(target_level: f32) -> Self {
        Self {
            target_level,
            gain: 1.0,
            sample_rate: 0,
            channels: 0,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Default for GainNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_LEVEL)
    }
}

impl Processor for GainNormalizer {
    fn initialize(&mut self, sample_rate: u32, channels: u16) -> Result<(), ConfigError> {
        if channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if sample_rate == 0 {
            return Err(ConfigError::UnsupportedSampleRate(sample_rate));
        }
        self.sample_rate = sample_rate;
        self.channels = channels;
        self.gain = 1.0;
        Ok(())
    }

    fn process(&mut self, samples: &mut [i16]) {
        if self.sample_rate == 0 || samples.is_empty() {
            return;
        }
        let n = samples.len();
        let sum_sq: f64 = samples
            .iter()
            .map(|&s| {
                let x = f64::from(s) / 32_768.0;
                x * x
            })
            .sum();
        let rms = (sum_sq / n as f64).sqrt() as f32;

        if rms > RMS_EPSILON {
            let desired = (self.target_level / rms).clamp(MIN_GAIN, MAX_GAIN);
            let time_constant = if desired < self.gain {
                ATTACK_SECONDS
            } else {
                RELEASE_SECONDS
            };
            let frames = n / self.channels.max(1) as usize;
            let block_duration = frames as f32 / self.sample_rate as f32;
            let k = 1.0 - (-block_duration / time_constant).exp();
            self.gain += k * (desired - self.gain);
        }

        for sample in samples.iter_mut() {
            let scaled = f32::from(*sample) * self.gain;
            *sample = scaled.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }

    fn reset(&mut self) {
        self.gain = 1.0;
    }
}

#[cfg(test)]
mod tests;
