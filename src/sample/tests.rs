use super::*;

#[test]
fn int16_round_trip_within_one_lsb() {
    let input: Vec<i16> = vec![i16::MIN, -1, 0, 1, 12345, i16::MAX];
    let mut floats = Vec::new();
    int16_to_float(&input, &mut floats);
    let mut back = Vec::new();
    float_to_int16(&floats, &mut back);
    for (a, b) in input.iter().zip(back.iter()) {
        assert!((*a as i32 - *b as i32).abs() <= 1, "{a} vs {b}");
    }
}

#[test]
fn int16_to_float_range() {
    let input = vec![i16::MIN, i16::MAX];
    let mut floats = Vec::new();
    int16_to_float(&input, &mut floats);
    assert!(floats[0] >= -1.0 && floats[0] < 1.0);
    assert!(floats[1] >= -1.0 && floats[1] < 1.0);
}

#[test]
fn downmix_stereo_overflow_pair_is_zero() {
    let input = vec![32000.0 / 32768.0, -32000.0 / 32768.0].repeat(4);
    let mut out = Vec::new();
    downmix_to_mono(&input, 2, &mut out);
    for v in out {
        assert!(v.abs() < 1e-6);
    }
}

#[test]
fn downmix_mono_passthrough() {
    let input = vec![0.1, 0.2, 0.3];
    let mut out = Vec::new();
    downmix_to_mono(&input, 1, &mut out);
    assert_eq!(out, input);
}

#[test]
fn resample_identity_when_rates_match() {
    let input = vec![0.1, 0.2, 0.3, 0.4];
    let out = resample_linear(&input, 16_000, 16_000);
    assert_eq!(out, input);
}

#[test]
fn resample_linear_upsample_doubles_length() {
    let input = vec![0.0, 1.0, 0.0, -1.0];
    let out = resample_linear(&input, 8_000, 16_000);
    assert_eq!(out.len(), 8);
}

#[test]
fn resample_linear_matches_formula_midpoint() {
    // R_in/R_out = 2.0, so output sample 1 sources pos=2.0 exactly -> input[2]
    let input = vec![0.0, 1.0, 2.0, 3.0];
    let out = resample_linear(&input, 32_000, 16_000);
    assert_eq!(out.len(), 2);
    assert!((out[0] - 0.0).abs() < 1e-6);
    assert!((out[1] - 2.0).abs() < 1e-6);
}

#[test]
fn load_and_convert_rejects_unknown_extension() {
    let path = std::path::Path::new("clip.mp3");
    let mut a = Vec::new();
    let mut b = Vec::new();
    let err = load_and_convert(path, 16_000, &mut a, &mut b).unwrap_err();
    assert!(matches!(err, InputError::UnrecognizedExtension(_)));
}

#[test]
fn load_and_convert_rejects_missing_file() {
    let path = std::path::Path::new("/no/such/clip.wav");
    let mut a = Vec::new();
    let mut b = Vec::new();
    assert!(load_and_convert(path, 16_000, &mut a, &mut b).is_err());
}

#[test]
fn load_and_convert_reads_written_wav() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 48_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..480 {
            let v = ((i % 100) as i16) * 100;
            writer.write_sample(v).unwrap();
            writer.write_sample(-v).unwrap();
        }
        writer.finalize().unwrap();
    }
    let mut a = Vec::new();
    let mut b = Vec::new();
    let out = load_and_convert(&path, 16_000, &mut a, &mut b).unwrap();
    assert!(!out.is_empty());
    // 48kHz stereo interleaved L=-R, mono downmix should be ~0 everywhere.
    for v in &out {
        assert!(v.abs() < 1e-3, "expected near-silence after downmix: {v}");
    }
}
