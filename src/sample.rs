//! Sample-format conversion: int16⇄float, channel downmix, linear-interpolation
//! resampling, and container load-and-convert (spec §4.1, component C1).
//!
//! These are pure functions operating on caller-provided buffers; the only
//! state involved is the scratch capacity callers choose to reuse across
//! calls to stay allocation-free in steady state.

use crate::error::InputError;
use std::cmp::Ordering;
use std::path::Path;

#[cfg(feature = "high-quality-audio")]
use rubato::{InterpolationParameters, InterpolationType, Resampler, SincFixedIn, WindowFunction};

/// Convert interleaved int16 samples to float, appending to `out`.
/// Output values fall in `[-1.0, 1.0)` for normal input.
pub fn int16_to_float(input: &[i16], out: &mut Vec<f32>) {
    out.clear();
    out.reserve(input.len());
    out.extend(input.iter().map(|&s| f32::from(s) / 32_768.0));
}

/// Convert float samples back to int16, clamping to `[-1.0, 1.0]` first.
/// The asymmetric `* 32767.0` scale plus truncation bounds round-trip error
/// to one LSB (spec §4.1).
pub fn float_to_int16(input: &[f32], out: &mut Vec<i16>) {
    out.clear();
    out.reserve(input.len());
    out.extend(input.iter().map(|&s| (s.clamp(-1.0, 1.0) * 32_767.0) as i16));
}

/// Downmix interleaved multi-channel float audio to mono by arithmetic mean
/// of each frame.
pub fn downmix_to_mono(input: &[f32], channels: usize, out: &mut Vec<f32>) {
    out.clear();
    if channels <= 1 {
        out.extend_from_slice(input);
        return;
    }
    out.reserve(input.len() / channels + 1);
    for frame in input.chunks(channels) {
        let sum: f32 = frame.iter().sum();
        out.push(sum / frame.len() as f32);
    }
}

/// Linear-interpolation resample with no anti-aliasing filter. Callers
/// requiring fidelity above `0.45 * out_rate` must band-limit upstream
/// (spec §4.1).
pub fn resample_linear(input: &[f32], in_rate: u32, out_rate: u32) -> Vec<f32> {
    if input.is_empty() || in_rate == 0 || out_rate == 0 || in_rate == out_rate {
        return input.to_vec();
    }
    let ratio = in_rate as f64 / out_rate as f64;
    let n_in = input.len();
    let n_out = ((n_in as f64) * (out_rate as f64 / in_rate as f64)).round() as usize;
    let mut out = Vec::with_capacity(n_out);
    for i in 0..n_out {
        let pos = i as f64 * ratio;
        let idx = pos.floor() as usize;
        let frac = (pos - idx as f64) as f32;
        let a = input[idx.min(n_in - 1)];
        let b = if idx + 1 < n_in {
            input[idx + 1]
        } else {
            input[n_in - 1]
        };
        out.push(a * (1.0 - frac) + b * frac);
    }
    out
}

#[cfg(feature = "high-quality-audio")]
fn resample_sinc(input: &[f32], in_rate: u32, out_rate: u32) -> Option<Vec<f32>> {
    if input.is_empty() || in_rate == 0 || out_rate == 0 || in_rate == out_rate {
        return Some(input.to_vec());
    }
    let ratio = out_rate as f64 / in_rate as f64;
    let chunk = 256usize;
    let params = InterpolationParameters {
        sinc_len: 64,
        f_cutoff: 0.90,
        interpolation: InterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut rs = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk, 1).ok()?;
    let expect = ((input.len() as f64) * ratio).round() as usize;
    let mut out = Vec::with_capacity(expect + chunk);
    let mut idx = 0usize;
    let mut seg = vec![0.0f32; chunk];
    while idx < input.len() {
        let end = (idx + chunk).min(input.len());
        let len = end - idx;
        let pad = input.get(end.wrapping_sub(1)).copied().unwrap_or(0.0);
        seg.fill(pad);
        seg[..len].copy_from_slice(&input[idx..end]);
        let produced = rs.process(std::slice::from_ref(&seg), None).ok()?;
        out.extend_from_slice(&produced[0]);
        idx = end;
    }
    match out.len().cmp(&expect) {
        Ordering::Greater => out.truncate(expect),
        Ordering::Less => {
            let pad = *out.last().unwrap_or(&0.0);
            out.resize(expect, pad);
        }
        Ordering::Equal => {}
    }
    Some(out)
}

/// Resample float audio from `in_rate` to `out_rate`. Uses a sinc resampler
/// when the `high-quality-audio` feature is enabled, falling back to linear
/// interpolation when that feature is off or the sinc resampler fails to
/// construct.
pub fn resample(input: &[f32], in_rate: u32, out_rate: u32) -> Vec<f32> {
    #[cfg(feature = "high-quality-audio")]
    {
        if let Some(out) = resample_sinc(input, in_rate, out_rate) {
            return out;
        }
        tracing::warn!(in_rate, out_rate, "sinc resampler failed, falling back to linear");
    }
    resample_linear(input, in_rate, out_rate)
}

/// Read a WAV file, downmix to mono, and resample to `target_rate`.
///
/// `stereo_scratch` and `resample_scratch` are caller-owned buffers reused
/// across calls to avoid repeated allocation; they grow one-way and are
/// never shrunk (spec §9, "growing scratch buffers, never shrinking").
pub fn load_and_convert(
    path: &Path,
    target_rate: u32,
    stereo_scratch: &mut Vec<f32>,
    resample_scratch: &mut Vec<f32>,
) -> Result<Vec<f32>, InputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("wav") => {}
        Some(other) => return Err(InputError::UnrecognizedExtension(other.to_string())),
        None => return Err(InputError::UnrecognizedExtension(String::new())),
    }

    let mut reader = hound::WavReader::open(path).map_err(|source| InputError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let floats: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()
                .map_err(|source| InputError::Decode {
                    path: path.to_path_buf(),
                    source,
                })?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|source| InputError::Decode {
                path: path.to_path_buf(),
                source,
            })?,
    };

    downmix_to_mono(&floats, channels, stereo_scratch);
    resample_scratch.clear();
    resample_scratch.extend(resample(stereo_scratch, spec.sample_rate, target_rate));
    Ok(resample_scratch.clone())
}

#[cfg(test)]
mod tests;
