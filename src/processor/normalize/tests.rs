use super::*;

#[test]
fn rejects_zero_channels() {
    let mut gn = GainNormalizer::default();
    assert!(matches!(
        gn.initialize(48_000, 0),
        Err(ConfigError::ZeroChannels)
    ));
}

#[test]
fn identity_when_rms_already_at_target() {
    let mut gn = GainNormalizer::new(0.3);
    gn.initialize(48_000, 1).unwrap();
    // amplitude chosen so RMS of a sine ~= target_level already.
    let amplitude = 0.3 * std::f32::consts::SQRT_2;
    let mut samples: Vec<i16> = (0..4800)
        .map(|n| {
            let t = n as f32 / 48_000.0;
            (amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 32_767.0) as i16
        })
        .collect();
    for _ in 0..20 {
        let mut block = samples.clone();
        gn.process(&mut block);
    }
    assert!((gn.gain() - 1.0).abs() < 0.1, "gain was {}", gn.gain());
    gn.process(&mut samples);
}
