//! Pipeline configuration (spec §6, ambient stack), loaded from TOML via
//! `serde`, grounded on the teacher's own CLI-config module but adapted from
//! `clap` argument parsing to a library-facing declarative file — this is a
//! pure core library now, not a CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asr::ModelSize;
use crate::segmenter::VadPreset;
use crate::subtitle::OutputFormat;

fn default_sample_rate() -> u32 {
    48_000
}

fn default_channels() -> u16 {
    1
}

fn default_frames_per_buffer() -> usize {
    480
}

fn default_hpf_cutoff() -> f32 {
    80.0
}

fn default_target_level() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_asr_language() -> String {
    "auto".to_string()
}

fn default_asr_threads() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VadPresetName {
    VerySensitive,
    Sensitive,
    Balanced,
    Conservative,
    VeryConservative,
}

impl From<VadPresetName> for VadPreset {
    fn from(name: VadPresetName) -> Self {
        match name {
            VadPresetName::VerySensitive => VadPreset::VerySensitive,
            VadPresetName::Sensitive => VadPreset::Sensitive,
            VadPresetName::Balanced => VadPreset::Balanced,
            VadPresetName::Conservative => VadPreset::Conservative,
            VadPresetName::VeryConservative => VadPreset::VeryConservative,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSizeName {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl From<ModelSizeName> for ModelSize {
    fn from(name: ModelSizeName) -> Self {
        match name {
            ModelSizeName::Tiny => ModelSize::Tiny,
            ModelSizeName::Base => ModelSize::Base,
            ModelSizeName::Small => ModelSize::Small,
            ModelSizeName::Medium => ModelSize::Medium,
            ModelSizeName::Large => ModelSize::Large,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormatName {
    Plain,
    Srt,
    Vtt,
}

impl From<OutputFormatName> for OutputFormat {
    fn from(name: OutputFormatName) -> Self {
        match name {
            OutputFormatName::Plain => OutputFormat::Plain,
            OutputFormatName::Srt => OutputFormat::Srt,
            OutputFormatName::Vtt => OutputFormat::Vtt,
        }
    }
}

/// The full declarative configuration for one pipeline instance (spec §6's
/// configuration table).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// 1 or 2; higher values allowed by C3 but not by C4.
    #[serde(default = "default_channels")]
    pub channels: u16,
    #[serde(default = "default_frames_per_buffer")]
    pub frames_per_buffer: usize,

    #[serde(default = "default_true")]
    pub enable_hpf: bool,
    #[serde(default = "default_hpf_cutoff")]
    pub hpf_cutoff: f32,

    #[serde(default = "default_true")]
    pub enable_normalize: bool,
    #[serde(default = "default_target_level")]
    pub target_level: f32,

    #[serde(default)]
    pub enable_suppress: bool,

    #[serde(default = "default_vad_preset")]
    pub vad_preset: VadPresetName,
    #[serde(default)]
    pub vad_adaptive: bool,

    pub asr_model_path: Option<PathBuf>,
    #[serde(default = "default_asr_language")]
    pub asr_language: String,
    #[serde(default = "default_asr_threads")]
    pub asr_threads: usize,
    #[serde(default)]
    pub asr_translate: bool,
    #[serde(default = "default_model_size")]
    pub asr_model_size: ModelSizeName,

    #[serde(default = "default_output_format")]
    pub output_format: OutputFormatName,
}

fn default_vad_preset() -> VadPresetName {
    VadPresetName::Balanced
}

fn default_model_size() -> ModelSizeName {
    ModelSizeName::Base
}

fn default_output_format() -> OutputFormatName {
    OutputFormatName::Plain
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            frames_per_buffer: default_frames_per_buffer(),
            enable_hpf: true,
            hpf_cutoff: default_hpf_cutoff(),
            enable_normalize: true,
            target_level: default_target_level(),
            enable_suppress: false,
            vad_preset: default_vad_preset(),
            vad_adaptive: false,
            asr_model_path: None,
            asr_language: default_asr_language(),
            asr_threads: default_asr_threads(),
            asr_translate: false,
            asr_model_size: default_model_size(),
            output_format: default_output_format(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text. Missing fields fall back to
    /// their documented defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a configuration file from disk.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.sample_rate, 48_000);
        assert_eq!(cfg.channels, 1);
        assert!(cfg.enable_hpf);
        assert!(cfg.enable_normalize);
        assert!(!cfg.enable_suppress);
        assert!(!cfg.vad_adaptive);
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let cfg = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.sample_rate, 48_000);
        assert!(matches!(cfg.vad_preset, VadPresetName::Balanced));
    }

    #[test]
    fn partial_toml_overrides_only_specified_fields() {
        let text = r#"
            sample_rate = 44100
            enable_suppress = true
            vad_preset = "very_conservative"
        "#;
        let cfg = PipelineConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.sample_rate, 44_100);
        assert!(cfg.enable_suppress);
        assert!(matches!(cfg.vad_preset, VadPresetName::VeryConservative));
        assert!(cfg.enable_hpf, "unspecified fields keep their defaults");
    }

    #[test]
    fn from_toml_file_rejects_missing_path() {
        let result = PipelineConfig::from_toml_file(Path::new("/no/such/config.toml"));
        assert!(result.is_err());
    }
}
