use super::*;

#[test]
fn rejects_empty_or_ragged_input() {
    assert!(AudioBuffer::from_planar(24_000, vec![]).is_err());
    assert!(AudioBuffer::from_planar(24_000, vec![vec![]]).is_err());
    assert!(AudioBuffer::from_planar(0, vec![vec![0.0]]).is_err());
    assert!(AudioBuffer::from_planar(24_000, vec![vec![0.0; 3], vec![0.0; 2]]).is_err());
}

#[test]
fn duration_follows_frames_and_rate() {
    let b = AudioBuffer::from_planar(24_000, vec![vec![0.0; 12_000]]).unwrap();
    assert_eq!(b.frames(), 12_000);
    assert_eq!(b.channel_count(), 1);
    assert!((b.duration_secs() - 0.5).abs() < 1e-12);
}

#[test]
fn lerp_interpolates_and_reuses_last_channel() {
    let b = AudioBuffer::from_planar(8, vec![vec![0.0, 1.0, 0.5]]).unwrap();
    assert_eq!(b.sample_lerp(0, 0.5), 0.5);
    assert_eq!(b.sample_lerp(1, 1.0), 1.0);
    assert_eq!(b.sample_lerp(0, 2.0), 0.5);
    assert_eq!(b.sample_lerp(0, 3.0), 0.0);
    assert_eq!(b.sample_lerp(0, -1.0), 0.0);
}

#[test]
fn wav_export_round_trips_through_hound() {
    let left = vec![0.0, 0.5, -1.0, 16_384.0 / 32_768.0];
    let right = vec![-0.25, 0.0, 0.75, 1.0];
    let b = AudioBuffer::from_planar(24_000, vec![left, right]).unwrap();
    let bytes = b.to_wav_bytes().unwrap();

    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 24_000);
    assert_eq!(spec.bits_per_sample, 16);
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(
        samples,
        vec![0, -8192, 16384, 0, -32768, 24576, 16384, 32767]
    );
}

#[test]
fn write_wav_creates_parent_directories() {
    let dir = std::env::temp_dir().join(format!("postmedia-wav-{}", std::process::id()));
    let path = dir.join("nested").join("voice.wav");
    let b = AudioBuffer::from_planar(24_000, vec![vec![0.1; 240]]).unwrap();
    b.write_wav(&path).unwrap();
    assert!(std::fs::metadata(&path).unwrap().len() > 44);
    let _ = std::fs::remove_dir_all(&dir);
}
