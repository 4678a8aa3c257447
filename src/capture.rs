//! Capture driver contract (spec §1, out-of-scope external collaborator) and
//! a `cpal`-backed reference implementation.
//!
//! Grounded on the device-enumeration and stream-building pattern of the
//! teacher's own recorder, adapted from a fixed-duration capture to an
//! indefinite start/stop lifecycle driving a user callback.

use crate::error::ResourceError;

/// A microphone or other audio input device, as reported by the host
/// (spec §6, `enumerate()`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Opaque identifier to pass back to `start`'s `device_name`. No stable
    /// numeric device IDs exist across host backends, so this is the same
    /// string as `name`.
    pub id: String,
    pub name: String,
    pub max_input_channels: u16,
    pub max_output_channels: u16,
    pub supported_sample_rates: Vec<u32>,
    pub is_default: bool,
}

/// Supplies blocks of interleaved 16-bit PCM samples on a real-time thread.
/// Implementations must not allocate, block on I/O, or acquire long-held
/// locks inside the capture callback (spec §5).
pub trait CaptureDriver {
    /// Enumerate available input devices.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, ResourceError>;

    /// Open the named device (or the host default, when `None`) and begin
    /// invoking `callback` with interleaved int16 blocks at the device's
    /// native `(sample_rate, channels)`, which are returned alongside.
    fn start(
        &mut self,
        device_name: Option<&str>,
        callback: Box<dyn FnMut(&mut [i16]) + Send>,
    ) -> Result<(u32, u16), ResourceError>;

    /// Stop capture. Drains outstanding callbacks before returning; the sole
    /// cancellation primitive (spec §5).
    fn stop(&mut self);
}

#[cfg(feature = "cpal-capture")]
pub mod cpal_driver {
    use super::{CaptureDriver, DeviceInfo};
    use crate::error::ResourceError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{SampleFormat, StreamConfig};

    /// Reference [`CaptureDriver`] built on `cpal`. Every supported native
    /// sample format is converted to int16 up front so downstream stages stay
    /// format-agnostic, mirroring the teacher's float-normalization callback.
    pub struct CpalCaptureDriver {
        stream: Option<cpal::Stream>,
    }

    impl Default for CpalCaptureDriver {
        fn default() -> Self {
            Self { stream: None }
        }
    }

    impl CaptureDriver for CpalCaptureDriver {
        fn list_devices(&self) -> Result<Vec<DeviceInfo>, ResourceError> {
            let host = cpal::default_host();
            let devices = host
                .input_devices()
                .map_err(|e| ResourceError::Backend(e.to_string()))?;
            let default_name = host.default_input_device().and_then(|d| d.name().ok());
            let mut out = Vec::new();
            for device in devices {
                if let Ok(name) = device.name() {
                    let is_default = default_name.as_deref() == Some(name.as_str());

                    let mut max_input_channels = 0u16;
                    let mut supported_sample_rates = Vec::new();
                    if let Ok(configs) = device.supported_input_configs() {
                        for range in configs {
                            max_input_channels = max_input_channels.max(range.channels());
                            supported_sample_rates.push(range.min_sample_rate().0);
                            supported_sample_rates.push(range.max_sample_rate().0);
                        }
                    }
                    supported_sample_rates.sort_unstable();
                    supported_sample_rates.dedup();

                    // cpal enumerates input and output devices separately;
                    // this driver only lists input devices, so the output
                    // side of the documented contract is always empty.
                    out.push(DeviceInfo {
                        id: name.clone(),
                        name,
                        max_input_channels,
                        max_output_channels: 0,
                        supported_sample_rates,
                        is_default,
                    });
                }
            }
            Ok(out)
        }

        fn start(
            &mut self,
            device_name: Option<&str>,
            mut callback: Box<dyn FnMut(&mut [i16]) + Send>,
        ) -> Result<(u32, u16), ResourceError> {
            let host = cpal::default_host();
            let device = match device_name {
                Some(name) => {
                    let mut devices = host
                        .input_devices()
                        .map_err(|e| ResourceError::Backend(e.to_string()))?;
                    devices
                        .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                        .ok_or_else(|| ResourceError::DeviceNotFound(name.to_string()))?
                }
                None => host
                    .default_input_device()
                    .ok_or(ResourceError::NoInputDevices)?,
            };

            let default_config = device
                .default_input_config()
                .map_err(|e| ResourceError::Backend(e.to_string()))?;
            let format = default_config.sample_format();
            let config: StreamConfig = default_config.clone().into();
            let sample_rate = config.sample_rate.0;
            let channels = config.channels;

            let err_fn = |err| tracing::warn!(error = %err, "capture stream error");

            let stream = match format {
                SampleFormat::I16 => device.build_input_stream(
                    &config,
                    move |data: &[i16], _| {
                        let mut scratch = data.to_vec();
                        callback(&mut scratch);
                    },
                    err_fn,
                    None,
                ),
                SampleFormat::F32 => device.build_input_stream(
                    &config,
                    move |data: &[f32], _| {
                        let mut scratch: Vec<i16> =
                            data.iter().map(|&s| (s.clamp(-1.0, 1.0) * 32_767.0) as i16).collect();
                        callback(&mut scratch);
                    },
                    err_fn,
                    None,
                ),
                SampleFormat::U16 => device.build_input_stream(
                    &config,
                    move |data: &[u16], _| {
                        let mut scratch: Vec<i16> = data
                            .iter()
                            .map(|&s| (s as i32 - 32_768) as i16)
                            .collect();
                        callback(&mut scratch);
                    },
                    err_fn,
                    None,
                ),
                other => {
                    return Err(ResourceError::Backend(format!(
                        "unsupported sample format: {other:?}"
                    )))
                }
            }
            .map_err(|e| ResourceError::Backend(e.to_string()))?;

            stream
                .play()
                .map_err(|e| ResourceError::Backend(e.to_string()))?;
            self.stream = Some(stream);
            Ok((sample_rate, channels))
        }

        fn stop(&mut self) {
            self.stream = None;
        }
    }
}

#[cfg(all(test, feature = "cpal-capture"))]
mod tests {
    use super::cpal_driver::CpalCaptureDriver;
    use super::CaptureDriver;

    #[test]
    fn list_devices_does_not_panic_without_hardware() {
        let driver = CpalCaptureDriver::default();
        // CI environments commonly have zero input devices; this must still
        // return a (possibly empty) list rather than erroring.
        let _ = driver.list_devices();
    }
}
