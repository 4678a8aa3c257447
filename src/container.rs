//! Container writer contract (spec §1, out-of-scope external collaborator)
//! and a `hound`-backed reference implementation for PCM-in-RIFF (WAV)
//! output, grounded on the pack's own WAV-encoding module.

use std::path::Path;

use crate::error::InputError;

/// Consumes processed int16 sample blocks and writes them as a lossless
/// container. `write` is called from the capture callback path in typical
/// usage, so implementations should avoid long-held locks or unbounded
/// blocking I/O (spec §5).
pub trait ContainerWriter {
    fn write(&mut self, samples: &[i16]) -> Result<(), InputError>;
    fn finalize(self: Box<Self>) -> Result<(), InputError>;
}

/// Reference [`ContainerWriter`] writing 16-bit PCM in a RIFF/WAV container
/// via `hound`.
pub struct PcmWavWriter {
    writer: hound::WavWriter<std::io::BufWriter<std::fs::File>>,
}

impl PcmWavWriter {
    pub fn create(path: &Path, sample_rate: u32, channels: u16) -> Result<Self, InputError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec).map_err(|source| InputError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { writer })
    }
}

impl ContainerWriter for PcmWavWriter {
    fn write(&mut self, samples: &[i16]) -> Result<(), InputError> {
        for &sample in samples {
            self.writer
                .write_sample(sample)
                .map_err(|e| InputError::InferenceFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<(), InputError> {
        self.writer
            .finalize()
            .map_err(|e| InputError::InferenceFailed(e.to_string()))
    }
}

/// A writer that additionally exposes its approximate compression ratio,
/// for compressed lossless container formats (spec §1 mentions "compressed
/// lossless frames" as an alternative output; no concrete codec is
/// prescribed, so this trait captures the shape without committing one).
pub trait CompressedContainerWriter: ContainerWriter {
    fn compression_ratio(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_finalize_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let mut writer = PcmWavWriter::create(&path, 16_000, 1).unwrap();
        writer.write(&[1, 2, 3, -1, -2, -3]).unwrap();
        Box::new(writer).finalize().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 6);
    }
}
