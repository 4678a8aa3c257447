//! Voice-activity segmenter (spec §4.5, component C5).
//!
//! A two-state machine (`Silent`/`Speech`) that turns a stream of
//! `(sample block, VAD scalar)` pairs into complete speech segments,
//! delivered via callback.

/// Hysteresis/threshold presets, from most to least eager to declare
/// speech (spec §6, `vad_preset`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadPreset {
    VerySensitive,
    Sensitive,
    Balanced,
    Conservative,
    VeryConservative,
}

impl VadPreset {
    /// `(speech_threshold, min_speech_frames, min_silence_frames)`.
    pub fn params(self) -> (f32, u32, u32) {
        match self {
            VadPreset::VerySensitive => (0.3, 1, 3),
            VadPreset::Sensitive => (0.4, 2, 4),
            VadPreset::Balanced => (0.5, 3, 5),
            VadPreset::Conservative => (0.6, 4, 7),
            VadPreset::VeryConservative => (0.7, 5, 10),
        }
    }
}

/// Exponential adaptive-threshold settings (spec §4.5, disabled by default).
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveConfig {
    pub beta: f32,
    pub margin: f32,
    pub t_min: f32,
    pub t_max: f32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            beta: 0.05,
            margin: 0.1,
            t_min: 0.0,
            t_max: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub speech_threshold: f32,
    pub min_speech_frames: u32,
    pub min_silence_frames: u32,
    pub max_segment_samples: usize,
    pub adaptive: Option<AdaptiveConfig>,
}

impl SegmenterConfig {
    pub fn from_preset(preset: VadPreset, max_segment_samples: usize) -> Self {
        let (speech_threshold, min_speech_frames, min_silence_frames) = preset.params();
        Self {
            speech_threshold,
            min_speech_frames,
            min_silence_frames,
            max_segment_samples,
            adaptive: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegState {
    Silent,
    Speech,
}

/// Stateful VAD segmenter. Consumes `(samples, vad_prob)` pairs one block
/// at a time and emits complete speech segments through a caller-supplied
/// closure.
pub struct VadSegmenter {
    config: SegmenterConfig,
    state: SegState,
    consecutive_speech_frames: u32,
    consecutive_silence_frames: u32,
    buffer: Vec<i16>,
    adaptive_mu: f32,
}

impl VadSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let adaptive_mu = config.speech_threshold;
        Self {
            config,
            state: SegState::Silent,
            consecutive_speech_frames: 0,
            consecutive_silence_frames: 0,
            buffer: Vec::new(),
            adaptive_mu,
        }
    }

    pub fn is_in_speech(&self) -> bool {
        self.state == SegState::Speech
    }

    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }

    fn effective_threshold(&self) -> f32 {
        match self.config.adaptive {
            Some(a) => (self.adaptive_mu + a.margin).clamp(a.t_min, a.t_max),
            None => self.config.speech_threshold,
        }
    }

    /// Process one logical frame. `on_segment` is invoked with the
    /// accumulated buffer when a segment boundary is reached; its contents
    /// are valid only for the duration of the call.
    pub fn process_frame(&mut self, samples: &[i16], vad_prob: f32, mut on_segment: impl FnMut(&[i16])) {
        let threshold = self.effective_threshold();
        let is_speech_frame = vad_prob >= threshold;

        if is_speech_frame {
            self.consecutive_speech_frames += 1;
            self.consecutive_silence_frames = 0;
        } else {
            self.consecutive_silence_frames += 1;
            self.consecutive_speech_frames = 0;
        }

        if let Some(a) = self.config.adaptive {
            self.adaptive_mu = (1.0 - a.beta) * self.adaptive_mu + a.beta * vad_prob;
        }

        match self.state {
            SegState::Silent => {
                if self.consecutive_speech_frames >= self.config.min_speech_frames {
                    self.state = SegState::Speech;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    if self.buffer.len() >= self.config.max_segment_samples {
                        on_segment(&self.buffer);
                        self.buffer.clear();
                        self.state = SegState::Silent;
                        self.consecutive_speech_frames = 0;
                        self.consecutive_silence_frames = 0;
                    }
                }
            }
            SegState::Speech => {
                self.buffer.extend_from_slice(samples);
                let exit_on_silence = self.consecutive_silence_frames >= self.config.min_silence_frames;
                let exit_on_overflow = self.buffer.len() >= self.config.max_segment_samples;
                if exit_on_silence || exit_on_overflow {
                    on_segment(&self.buffer);
                    self.buffer.clear();
                    self.state = SegState::Silent;
                    self.consecutive_speech_frames = 0;
                    self.consecutive_silence_frames = 0;
                }
            }
        }
    }

    /// Emit any non-empty buffered segment (regardless of silence state)
    /// and reset all state. Called at end-of-stream.
    pub fn flush(&mut self, mut on_segment: impl FnMut(&[i16])) {
        if !self.buffer.is_empty() {
            on_segment(&self.buffer);
        }
        self.buffer.clear();
        self.state = SegState::Silent;
        self.consecutive_speech_frames = 0;
        self.consecutive_silence_frames = 0;
        self.adaptive_mu = self.config.speech_threshold;
    }
}
