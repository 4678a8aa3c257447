//! Offline ASR front-end (spec §4.6, component C6).
//!
//! Loads a model, decodes input to the kernel's required representation via
//! [`crate::sample`], runs inference, and emits timestamped segments.

#[cfg(feature = "whisper")]
pub mod whisper_engine;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ConfigError, InputError, ResourceError};
use crate::sample;

/// ASR model size selector (spec §6, `asr_model_size`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone)]
pub struct AsrConfig {
    pub language: String,
    pub threads: usize,
    pub translate: bool,
    pub model_size: ModelSize,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            threads: 4,
            translate: false,
            model_size: ModelSize::Base,
        }
    }
}

/// One timestamped transcription result (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    pub confidence: f32,
}

/// One raw segment as read off the inference kernel's cursor, before the
/// 10ms-unit-to-millisecond conversion (spec §4.6).
#[derive(Debug, Clone)]
pub struct KernelSegment {
    pub t0_centiseconds: u64,
    pub t1_centiseconds: u64,
    pub text: String,
    pub confidence: f32,
}

/// The opaque inference-kernel contract (spec §6): load a model from disk,
/// run inference over 16kHz mono float samples, and iterate the resulting
/// segment cursor.
pub trait AsrEngine: Send {
    fn load(model_path: &Path) -> Result<Self, ResourceError>
    where
        Self: Sized;

    fn run(&mut self, samples: &[f32], config: &AsrConfig) -> Result<Vec<KernelSegment>, InputError>;
}

/// Generic ASR front-end parameterized by the inference kernel. Converts
/// input to the kernel's required format via [`sample`], runs the kernel,
/// and maps its segment cursor to millisecond-timestamped output.
pub struct Transcriber<E: AsrEngine> {
    engine: Option<E>,
    config: AsrConfig,
    last_error: Mutex<Option<String>>,
    float_scratch: Vec<f32>,
    mono_scratch: Vec<f32>,
    resample_scratch: Vec<f32>,
}

const TARGET_RATE: u32 = 16_000;

impl<E: AsrEngine> Transcriber<E> {
    pub fn new(config: AsrConfig) -> Self {
        Self {
            engine: None,
            config,
            last_error: Mutex::new(None),
            float_scratch: Vec::new(),
            mono_scratch: Vec::new(),
            resample_scratch: Vec::new(),
        }
    }

    /// Loads the model from `model_path`. Fails with a descriptive error if
    /// the path is absent, unreadable, or malformed.
    pub fn initialize(&mut self, model_path: &Path) -> Result<(), ConfigError> {
        if !model_path.exists() {
            return Err(ConfigError::MissingModelPath(model_path.to_path_buf()));
        }
        let engine = E::load(model_path).map_err(|_| ConfigError::MissingModelPath(model_path.to_path_buf()))?;
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// The most recent failure message, cleared on every successful call.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    fn record_error(&self, err: &InputError) {
        *self.last_error.lock().unwrap() = Some(err.to_string());
    }

    fn clear_error(&self) {
        *self.last_error.lock().unwrap() = None;
    }

    /// Transcribe a buffer of interleaved int16 samples at `(sample_rate,
    /// channels)`, converting to 16kHz mono float internally. An empty
    /// input returns an empty segment list rather than an error.
    pub fn transcribe_buffer(
        &mut self,
        samples: &[i16],
        sample_rate: u32,
        channels: u16,
    ) -> Result<Vec<TranscriptSegment>, InputError> {
        if self.engine.is_none() {
            let err = InputError::NotInitialized;
            self.record_error(&err);
            return Err(err);
        }

        if samples.is_empty() {
            self.clear_error();
            return Ok(Vec::new());
        }

        sample::int16_to_float(samples, &mut self.float_scratch);
        sample::downmix_to_mono(&self.float_scratch, channels as usize, &mut self.mono_scratch);
        self.resample_scratch = sample::resample(&self.mono_scratch, sample_rate, TARGET_RATE);

        let engine = self.engine.as_mut().expect("checked above");
        match engine.run(&self.resample_scratch, &self.config) {
            Ok(kernel_segments) => {
                self.clear_error();
                Ok(kernel_segments
                    .into_iter()
                    .map(|k| TranscriptSegment {
                        start_ms: k.t0_centiseconds * 10,
                        end_ms: k.t1_centiseconds * 10,
                        text: k.text,
                        confidence: k.confidence,
                    })
                    .collect())
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Wraps [`transcribe_buffer`] with an up-front container decode,
    /// downmix, and resample via [`sample::load_and_convert`].
    pub fn transcribe_file(&mut self, path: &Path) -> Result<Vec<TranscriptSegment>, InputError> {
        if self.engine.is_none() {
            let err = InputError::NotInitialized;
            self.record_error(&err);
            return Err(err);
        }

        let floats = sample::load_and_convert(
            path,
            TARGET_RATE,
            &mut self.mono_scratch,
            &mut self.resample_scratch,
        )
        .map_err(|e| {
            self.record_error(&e);
            e
        })?;

        let engine = self.engine.as_mut().expect("checked above");
        match engine.run(&floats, &self.config) {
            Ok(kernel_segments) => {
                self.clear_error();
                Ok(kernel_segments
                    .into_iter()
                    .map(|k| TranscriptSegment {
                        start_ms: k.t0_centiseconds * 10,
                        end_ms: k.t1_centiseconds * 10,
                        text: k.text,
                        confidence: k.confidence,
                    })
                    .collect())
            }
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }
}

/// Engine used in tests and as a documentation example: never fails, and
/// echoes back one segment spanning the whole input.
pub struct EchoEngine {
    #[allow(dead_code)]
    model_path: PathBuf,
}

impl AsrEngine for EchoEngine {
    fn load(model_path: &Path) -> Result<Self, ResourceError> {
        Ok(Self {
            model_path: model_path.to_path_buf(),
        })
    }

    fn run(&mut self, samples: &[f32], _config: &AsrConfig) -> Result<Vec<KernelSegment>, InputError> {
        let duration_cs = (samples.len() as u64 * 100) / TARGET_RATE as u64;
        Ok(vec![KernelSegment {
            t0_centiseconds: 0,
            t1_centiseconds: duration_cs,
            text: String::new(),
            confidence: 1.0,
        }])
    }
}
