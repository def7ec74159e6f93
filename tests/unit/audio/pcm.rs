use super::*;

fn le(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[test]
fn normalizes_by_the_i16_ceiling() {
    let b = decode_pcm(&le(&[0, 16_384, -32_768, 32_767]), 24_000, 1).unwrap();
    let ch = b.channel(0).unwrap();
    assert_eq!(ch[0], 0.0);
    assert_eq!(ch[1], 0.5);
    assert_eq!(ch[2], -1.0);
    assert!(ch[3] < 1.0);
    assert!((ch[3] - 32_767.0 / 32_768.0).abs() < 1e-9);
}

#[test]
fn odd_byte_counts_truncate_the_last_sample() {
    let mut bytes = le(&[100, 200, 300]);
    bytes.push(0x7f);
    let b = decode_pcm(&bytes, 24_000, 1).unwrap();
    assert_eq!(b.frames(), 3);
}

#[test]
fn four_byte_payload_is_two_frames_long() {
    let b = decode_pcm(&le(&[1, 2]), DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS).unwrap();
    assert_eq!(b.frames(), 2);
    assert_eq!(b.sample_rate(), 24_000);
    assert_eq!(b.channel_count(), 1);
}

#[test]
fn stereo_is_deinterleaved() {
    let bytes = le(&[1_000, -1_000, 2_000, -2_000, 3_000]);
    let b = decode_pcm(&bytes, 48_000, 2).unwrap();
    assert_eq!(b.frames(), 2);
    assert_eq!(b.channel(0).unwrap(), &[1_000.0 / 32_768.0, 2_000.0 / 32_768.0]);
    assert_eq!(b.channel(1).unwrap(), &[-1_000.0 / 32_768.0, -2_000.0 / 32_768.0]);
}

#[test]
fn empty_and_degenerate_inputs_are_decode_errors() {
    for (bytes, rate, ch) in [
        (vec![], 24_000, 1),
        (vec![0x01], 24_000, 1),
        (le(&[1]), 24_000, 2),
        (le(&[1, 2]), 0, 1),
        (le(&[1, 2]), 24_000, 0),
        (le(&[1, 2]), 24_000, 33),
    ] {
        let err = decode_pcm(&bytes, rate, ch).unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)), "{err}");
    }
}

#[test]
fn artifact_decode_uses_mono_24k_and_relabels_base64_errors() {
    let art = EncodedArtifact::from_bytes(&le(&[0; 2_400]));
    let b = decode_audio(&art).unwrap();
    assert_eq!(b.frames(), 2_400);
    assert!((b.duration_secs() - 0.1).abs() < 1e-12);

    let err = decode_audio(&EncodedArtifact::from_encoded("not*base64")).unwrap_err();
    assert!(matches!(err, MediaError::Decode(_)));
}

#[test]
fn decoding_is_bit_for_bit_repeatable() {
    let bytes: Vec<u8> = (0..10_001u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8)
        .collect();
    let a = decode_pcm(&bytes, 24_000, 1).unwrap();
    let b = decode_pcm(&bytes, 24_000, 1).unwrap();
    assert_eq!(a.frames(), 5_000);

    let bits = |buf: &AudioBuffer| -> Vec<u32> {
        buf.channel(0).unwrap().iter().map(|s| s.to_bits()).collect()
    };
    assert_eq!(bits(&a), bits(&b));
    assert!(bits(&a).iter().any(|&x| x != 0));
}
