//! Neural-suppressor re-blocking adapter (spec §4.4, component C4).
//!
//! Bridges the variable-size interleaved int16 pipeline to a fixed-size
//! float mono-per-channel neural engine, and publishes a VAD scalar.

#[cfg(feature = "rnnoise")]
pub mod nnnoiseless_engine;

use crate::error::{ConfigError, ResourceError};
use crate::processor::Processor;

/// Supported adapter sample rates; fixed frame size is `rate / 100` (10ms).
const SUPPORTED_RATES: [u32; 3] = [24_000, 44_100, 48_000];

/// The opaque neural-suppression kernel contract (spec §6): create,
/// process a fixed-size frame in place, and be torn down via `Drop`
/// (idiomatic Rust stands in for an explicit `destroy` call).
pub trait SuppressionEngine: Send {
    /// Process one fixed-size frame. `out.len() == input.len()`. Returns
    /// the channel's VAD probability in `[0, 1]`.
    fn process_fixed_frame(&mut self, out: &mut [f32], input: &[f32]) -> f32;
}

/// Build one engine instance per channel. Returns `None` on acquisition
/// failure (spec §4.4: "Creates `channels` independent suppressor states").
pub trait SuppressionEngineFactory: Send + Sync {
    fn create(&self) -> Option<Box<dyn SuppressionEngine>>;
}

/// No-op engine used when no neural backend is linked in. `process`
/// becomes a no-op and the VAD scalar is fixed at `0.0` (spec §4.4,
/// "Passthrough mode").
#[derive(Default)]
pub struct PassthroughEngine;

impl SuppressionEngine for PassthroughEngine {
    fn process_fixed_frame(&mut self, out: &mut [f32], input: &[f32]) -> f32 {
        out.copy_from_slice(input);
        0.0
    }
}

pub struct PassthroughFactory;

impl SuppressionEngineFactory for PassthroughFactory {
    fn create(&self) -> Option<Box<dyn SuppressionEngine>> {
        Some(Box::new(PassthroughEngine))
    }
}

/// Which accumulator slots were filled during the *current* `process`
/// call. Slots filled by a previous call whose output buffer is gone by
/// the time a frame completes cannot be written back anywhere; they are
/// simply dropped from this call's output (one-frame latency, inherent to
/// re-blocking an asynchronous capture stream into a fixed kernel frame).
type Origin = Option<usize>;

pub struct NoiseSuppressorAdapter {
    factory: Box<dyn SuppressionEngineFactory>,
    sample_rate: u32,
    channels: u16,
    fixed_frame_samples: usize,
    states: Vec<Box<dyn SuppressionEngine>>,
    accumulator: Vec<f32>,
    origin: Vec<Origin>,
    write_pos: usize,
    scratch_in: Vec<f32>,
    scratch_out: Vec<f32>,
    float_buf: Vec<f32>,
    last_vad: f32,
    poisoned: bool,
}

impl NoiseSuppressorAdapter {
    pub fn new(factory: Box<dyn SuppressionEngineFactory>) -> Self {
        Self {
            factory,
            sample_rate: 0,
            channels: 0,
            fixed_frame_samples: 0,
            states: Vec::new(),
            accumulator: Vec::new(),
            origin: Vec::new(),
            write_pos: 0,
            scratch_in: Vec::new(),
            scratch_out: Vec::new(),
            float_buf: Vec::new(),
            last_vad: 0.0,
            poisoned: false,
        }
    }

    pub fn passthrough() -> Self {
        Self::new(Box::new(PassthroughFactory))
    }

    /// The most recent published VAD scalar. Valid only after at least one
    /// fixed frame has been processed; `0.0` beforehand (spec §4.4).
    pub fn vad_scalar(&self) -> f32 {
        self.last_vad
    }

    pub fn fixed_frame_samples(&self) -> usize {
        self.fixed_frame_samples
    }

    fn capacity(&self) -> usize {
        self.fixed_frame_samples * self.channels as usize
    }

    fn create_states(&self) -> Result<Vec<Box<dyn SuppressionEngine>>, ResourceError> {
        let mut states = Vec::with_capacity(self.channels as usize);
        for c in 0..self.channels as usize {
            match self.factory.create() {
                Some(state) => states.push(state),
                None => return Err(ResourceError::SuppressorStateCreation(c)),
            }
        }
        Ok(states)
    }
}

impl Processor for NoiseSuppressorAdapter {
    fn initialize(&mut self, sample_rate: u32, channels: u16) -> Result<(), ConfigError> {
        if !SUPPORTED_RATES.contains(&sample_rate) {
            return Err(ConfigError::UnsupportedSampleRate(sample_rate));
        }
        if channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        let fixed_frame_samples = (sample_rate / 100) as usize;
        let capacity = fixed_frame_samples
            .checked_mul(channels as usize)
            .ok_or(ConfigError::FrameSizeOverflow {
                sample_rate,
                channels,
            })?;

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.fixed_frame_samples = fixed_frame_samples;

        self.states = self.create_states().map_err(|_| ConfigError::FrameSizeOverflow {
            sample_rate,
            channels,
        })?;
        self.accumulator = vec![0.0; capacity];
        self.origin = vec![None; capacity];
        self.write_pos = 0;
        self.scratch_in = vec![0.0; fixed_frame_samples];
        self.scratch_out = vec![0.0; fixed_frame_samples];
        self.last_vad = 0.0;
        self.poisoned = false;
        Ok(())
    }

    fn process(&mut self, samples: &mut [i16]) {
        if self.poisoned || self.channels == 0 {
            return;
        }
        let n = samples.len();
        if self.float_buf.len() < n {
            self.float_buf.resize(n, 0.0);
        }
        for (i, &s) in samples.iter().enumerate() {
            self.float_buf[i] = f32::from(s) / 32_768.0;
        }

        // Stale residue from a previous call can't be written back into
        // this call's buffer; mark it unattributable up front.
        for slot in self.origin[..self.write_pos].iter_mut() {
            *slot = None;
        }

        let capacity = self.capacity();
        let mut cursor = 0usize;
        while cursor < n {
            let remaining_input = n - cursor;
            let remaining_capacity = capacity - self.write_pos;
            let k = remaining_capacity.min(remaining_input);
            self.accumulator[self.write_pos..self.write_pos + k]
                .copy_from_slice(&self.float_buf[cursor..cursor + k]);
            for i in 0..k {
                self.origin[self.write_pos + i] = Some(cursor + i);
            }
            self.write_pos += k;
            cursor += k;

            if self.write_pos == capacity {
                let channels = self.channels as usize;
                let frame_len = self.fixed_frame_samples;
                let mut vad_sum = 0.0f32;
                for c in 0..channels {
                    for i in 0..frame_len {
                        self.scratch_in[i] = self.accumulator[i * channels + c];
                    }
                    let vad = self.states[c]
                        .process_fixed_frame(&mut self.scratch_out, &self.scratch_in);
                    vad_sum += vad;
                    for i in 0..frame_len {
                        self.accumulator[i * channels + c] = self.scratch_out[i];
                    }
                }
                self.last_vad = vad_sum / channels as f32;

                for i in 0..capacity {
                    if let Some(pos) = self.origin[i] {
                        self.float_buf[pos] = self.accumulator[i];
                    }
                }
                self.write_pos = 0;
            }
        }

        for (i, v) in self.float_buf[..n].iter().enumerate() {
            samples[i] = (v.clamp(-1.0, 1.0) * 32_767.0) as i16;
        }
    }

    fn reset(&mut self) {
        if self.channels == 0 {
            return;
        }
        match self.create_states() {
            Ok(states) => {
                self.states = states;
                self.accumulator.iter_mut().for_each(|v| *v = 0.0);
                self.origin.iter_mut().for_each(|v| *v = None);
                self.write_pos = 0;
                self.last_vad = 0.0;
                self.poisoned = false;
            }
            Err(err) => {
                tracing::warn!(error = %err, "suppressor reset failed to recreate states");
                self.states.clear();
                self.poisoned = true;
            }
        }
    }
}
