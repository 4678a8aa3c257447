//! `nnnoiseless` (pure-Rust RNNoise port) backed [`SuppressionEngine`].
//!
//! Only valid at 48kHz: RNNoise's trained model is fixed to 480-sample
//! (10ms) frames at that rate, matching [`super::NoiseSuppressorAdapter`]'s
//! `fixed_frame_samples` derivation for `rate == 48_000`.

use nnnoiseless::DenoiseState;

use super::{SuppressionEngine, SuppressionEngineFactory};

pub struct NnnoiselessEngine {
    state: Box<DenoiseState<'static>>,
}

impl SuppressionEngine for NnnoiselessEngine {
    fn process_fixed_frame(&mut self, out: &mut [f32], input: &[f32]) -> f32 {
        let scaled_in: Vec<f32> = input.iter().map(|s| s * 32_768.0).collect();
        let mut scaled_out = vec![0.0f32; out.len()];
        let vad = self.state.process_frame(&mut scaled_out, &scaled_in);
        for (o, s) in out.iter_mut().zip(scaled_out.iter()) {
            *o = s / 32_768.0;
        }
        vad
    }
}

/// Factory that only succeeds for the 48kHz rate `nnnoiseless` was trained
/// on; callers at other rates should fall back to [`super::PassthroughEngine`].
pub struct NnnoiselessFactory;

impl SuppressionEngineFactory for NnnoiselessFactory {
    fn create(&self) -> Option<Box<dyn SuppressionEngine>> {
        Some(Box::new(NnnoiselessEngine {
            state: DenoiseState::new(),
        }))
    }
}
