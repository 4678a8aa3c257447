//! `whisper-rs` backed [`AsrEngine`] (spec §4.6), grounded on the stderr-silenced
//! loading dance and segment-stitching loop of the teacher's own Whisper wrapper.

use std::io;
use std::os::raw::{c_char, c_uint, c_void};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::sync::Once;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{AsrConfig, AsrEngine, KernelSegment};
use crate::error::{InputError, ResourceError};

pub struct WhisperEngine {
    ctx: WhisperContext,
}

impl AsrEngine for WhisperEngine {
    fn load(model_path: &Path) -> Result<Self, ResourceError> {
        install_whisper_log_silencer();

        let path_str = model_path
            .to_str()
            .ok_or_else(|| ResourceError::ModelLoad(model_path.to_path_buf()))?;

        let ctx = with_stderr_silenced(|| {
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
        })
        .map_err(|_| ResourceError::ModelLoad(model_path.to_path_buf()))?;

        Ok(Self { ctx })
    }

    fn run(&mut self, samples: &[f32], config: &AsrConfig) -> Result<Vec<KernelSegment>, InputError> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| InputError::InferenceFailed(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        if config.language.eq_ignore_ascii_case("auto") {
            params.set_language(None);
            params.set_detect_language(true);
        } else {
            params.set_language(Some(&config.language));
            params.set_detect_language(false);
        }
        params.set_n_threads(config.threads.max(1) as i32);
        params.set_translate(config.translate);
        params.set_print_progress(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_realtime(false);
        params.set_token_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| InputError::InferenceFailed(e.to_string()))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| InputError::InferenceFailed(e.to_string()))?;

        let mut segments = Vec::with_capacity(num_segments.max(0) as usize);
        for i in 0..num_segments {
            let text = state
                .full_get_segment_text_lossy(i)
                .unwrap_or_default()
                .replace("[BLANK_AUDIO]", "");
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0) as u64;
            let t1 = state.full_get_segment_t1(i).unwrap_or(t0 as i64).max(0) as u64;
            let no_speech_prob = state.full_get_segment_no_speech_prob(i).unwrap_or(0.0);
            segments.push(KernelSegment {
                t0_centiseconds: t0,
                t1_centiseconds: t1.max(t0),
                text,
                confidence: (1.0 - no_speech_prob).clamp(0.0, 1.0),
            });
        }
        Ok(segments)
    }
}

fn install_whisper_log_silencer() {
    static INSTALL_LOG_CALLBACK: Once = Once::new();
    INSTALL_LOG_CALLBACK.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    });
}

#[allow(unused_variables)]
unsafe extern "C" fn whisper_log_callback(_level: c_uint, _text: *const c_char, _user_data: *mut c_void) {}

/// Temporarily redirects stderr to `/dev/null` for the duration of `f`,
/// since whisper.cpp emits verbose initialization messages that would
/// otherwise bypass `tracing` entirely.
#[cfg(unix)]
fn with_stderr_silenced<T>(f: impl FnOnce() -> Result<T, whisper_rs::WhisperError>) -> io::Result<T> {
    let null = std::fs::OpenOptions::new().write(true).open("/dev/null")?;
    let null_fd = null.as_raw_fd();

    // SAFETY: dup/dup2 duplicate and restore the stderr file descriptor
    // around the call to `f`; we hold the only reference to the duplicate
    // and always restore before returning.
    let orig_stderr = unsafe { libc::dup(2) };
    if orig_stderr < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::dup2(null_fd, 2) } < 0 {
        unsafe { libc::close(orig_stderr) };
        return Err(io::Error::last_os_error());
    }

    let result = f();

    unsafe { libc::dup2(orig_stderr, 2) };
    unsafe { libc::close(orig_stderr) };

    result.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

#[cfg(not(unix))]
fn with_stderr_silenced<T>(f: impl FnOnce() -> Result<T, whisper_rs::WhisperError>) -> io::Result<T> {
    f().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
