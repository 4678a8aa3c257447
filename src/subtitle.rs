//! Subtitle emission (spec §6) — delivered by the component outside the core
//! scope, defined here for completeness of the ASR contract.

use crate::asr::TranscriptSegment;

fn ms_to_hhmmss(ms: u64, decimal_sep: char) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}{decimal_sep}{millis:03}")
}

/// One line of text per segment, no timestamps.
pub fn to_plain(segments: &[TranscriptSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(seg.text.trim());
        out.push('\n');
    }
    out
}

/// Index line, `HH:MM:SS,mmm --> HH:MM:SS,mmm` time range, text, blank line.
pub fn to_srt(segments: &[TranscriptSegment]) -> String {
    let mut out = String::new();
    for (idx, seg) in segments.iter().enumerate() {
        out.push_str(&(idx + 1).to_string());
        out.push('\n');
        out.push_str(&ms_to_hhmmss(seg.start_ms, ','));
        out.push_str(" --> ");
        out.push_str(&ms_to_hhmmss(seg.end_ms, ','));
        out.push('\n');
        out.push_str(seg.text.trim());
        out.push_str("\n\n");
    }
    out
}

/// `WEBVTT` header, blank line, then per-segment time ranges using `.` as
/// the millisecond separator.
pub fn to_vtt(segments: &[TranscriptSegment]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for seg in segments {
        out.push_str(&ms_to_hhmmss(seg.start_ms, '.'));
        out.push_str(" --> ");
        out.push_str(&ms_to_hhmmss(seg.end_ms, '.'));
        out.push('\n');
        out.push_str(seg.text.trim());
        out.push_str("\n\n");
    }
    out
}

/// Output format selector (spec §6, `output_format`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Srt,
    Vtt,
}

pub fn format(segments: &[TranscriptSegment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => to_plain(segments),
        OutputFormat::Srt => to_srt(segments),
        OutputFormat::Vtt => to_vtt(segments),
    }
}
