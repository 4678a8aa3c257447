//! Crate error types.
//!
//! Spec §7 splits failures into four kinds. Three are structured error
//! values; the fourth (real-time pipeline degradation) is never an error —
//! it is a log line plus pass-through, since the capture thread cannot
//! afford to drop audio by returning `Err`.

use std::path::PathBuf;
use thiserror::Error;

/// Returned by `initialize` when the requested parameters can't be
/// satisfied. The instance remains unusable until reconfigured.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample rate {0}Hz is not supported")]
    UnsupportedSampleRate(u32),
    #[error("channel count must be positive")]
    ZeroChannels,
    #[error("channel count {0} exceeds what this stage supports")]
    TooManyChannels(u16),
    #[error("fixed-frame size overflowed for {channels} channels at {sample_rate}Hz")]
    FrameSizeOverflow { sample_rate: u32, channels: u16 },
    #[error("processors can only be added before the chain is initialized")]
    ChainAlreadyInitialized,
    #[error("model path does not exist: {0}")]
    MissingModelPath(PathBuf),
}

/// Returned when acquiring a resource (model, neural state, scratch
/// allocation) fails. Any partially acquired resources are released
/// before returning.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to create suppressor state for channel {0}")]
    SuppressorStateCreation(usize),
    #[error("failed to load model from {0}")]
    ModelLoad(PathBuf),
    #[error("model file is unreadable: {0}")]
    ModelUnreadable(#[source] std::io::Error),
    #[error("no input devices available")]
    NoInputDevices,
    #[error("input device not found: {0}")]
    DeviceNotFound(String),
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Returned from a specific call when the *input data* is the problem
/// (unrecognized container, truncated file, decode failure, calling a
/// front-end before it's initialized). The instance itself remains
/// usable for subsequent calls.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("front-end used before initialization")]
    NotInitialized,
    #[error("unrecognized file extension: {0}")]
    UnrecognizedExtension(String),
    #[error("failed to decode audio file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("inference run failed: {0}")]
    InferenceFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
