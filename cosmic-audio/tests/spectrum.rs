use cosmic_audio::spectrum::{bin_of, Spectrum, BIN_COUNT};

#[test]
fn test_silent_spectrum_is_zero() {
    let bytes = Spectrum::new().to_bytes();
    assert_eq!(bytes.len(), BIN_COUNT);
    assert!(bytes.iter().all(|&b| b == 0));
}

#[test]
fn test_tone_lands_in_its_bin() {
    let mut s = Spectrum::new();
    s.add_tone(440.0, 0.05);
    let bytes = s.to_bytes();
    let idx = bin_of(440.0).unwrap();

    assert!(bytes[idx] > bytes[idx + 1]);
    assert!(bytes[idx + 1] > 0);
    assert_eq!(bytes[idx + 5], 0);
}

#[test]
fn test_out_of_range_tone_ignored() {
    let mut s = Spectrum::new();
    s.add_tone(30_000.0, 1.0);
    s.add_tone(0.0, 1.0);
    assert!(s.energy().iter().all(|&e| e == 0.0));
}

#[test]
fn test_noise_tilts_down() {
    let mut s = Spectrum::new();
    s.add_noise(0.1);
    let e = s.energy();
    assert!(e[0] > e[64]);
    assert!(e[127] > 0.0);
}
