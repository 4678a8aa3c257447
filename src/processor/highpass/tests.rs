use super::*;

#[test]
fn rejects_zero_channels() {
    let mut hpf = HighPassFilter::default();
    assert!(matches!(
        hpf.initialize(48_000, 0),
        Err(ConfigError::ZeroChannels)
    ));
}

#[test]
fn passes_high_frequency_tone_near_unattenuated() {
    let mut hpf = HighPassFilter::new(80.0);
    hpf.initialize(48_000, 1).unwrap();
    // 4kHz is far above 10x the 80Hz cutoff; amplitude should survive closely.
    let freq = 4_000.0;
    let rate = 48_000.0;
    let mut samples: Vec<i16> = (0..4800)
        .map(|n| {
            let t = n as f32 / rate;
            (0.5 * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32) as i16
        })
        .collect();
    let peak_in = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    hpf.process(&mut samples);
    let peak_out = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
    let ratio = peak_out as f32 / peak_in as f32;
    assert!(ratio > 0.95, "ratio was {ratio}");
}
