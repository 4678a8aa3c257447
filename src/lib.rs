//! Offline, low-latency voice processing engine: capture conditioning
//! (sample conversion, high-pass filter, gain normalization, neural
//! suppression), voice-activity segmentation, and offline ASR transcription.

pub mod asr;
pub mod capture;
pub mod config;
pub mod container;
pub mod error;
pub mod processor;
pub mod sample;
pub mod segmenter;
pub mod subtitle;
pub mod suppressor;
mod telemetry;

pub use telemetry::init_tracing;
