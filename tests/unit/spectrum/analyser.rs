use super::*;

fn fps15() -> Fps {
    Fps::whole(15).unwrap()
}

fn sine(freq: f32, amp: f32, secs: f32, sr: u32) -> Vec<f32> {
    let n = (secs * sr as f32) as usize;
    (0..n)
        .map(|i| amp * (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
        .collect()
}

#[test]
fn default_opts_yield_512_bins() {
    let a = FftAnalyser::new(Vec::new(), fps15(), AnalyserOpts::default()).unwrap();
    assert_eq!(a.bin_count(), 512);
    assert_eq!(a.duration_secs(), 0.0);
}

#[test]
fn rejects_bad_parameters() {
    let bad_size = AnalyserOpts {
        fft_size: 1000,
        ..Default::default()
    };
    assert!(FftAnalyser::new(Vec::new(), fps15(), bad_size).is_err());

    let bad_db = AnalyserOpts {
        min_db: -30.0,
        max_db: -100.0,
        ..Default::default()
    };
    assert!(FftAnalyser::new(Vec::new(), fps15(), bad_db).is_err());
}

#[test]
fn silence_maps_to_all_zero_snapshots() {
    let mut a = FftAnalyser::new(vec![0.0; 44_100], fps15(), AnalyserOpts::default()).unwrap();
    let mut out = vec![7u8; a.bin_count()];
    for _ in 0..3 {
        a.next_snapshot(&mut out).unwrap();
        assert!(out.iter().all(|&v| v == 0));
    }
    assert_eq!(a.position(), 3);
}

#[test]
fn sine_peaks_at_its_bin() {
    let opts = AnalyserOpts::default();
    let bin = 100.0;
    let freq = bin * opts.sample_rate as f32 / opts.fft_size as f32;
    let pcm = sine(freq, 0.01, 2.0, opts.sample_rate);
    let mut a = FftAnalyser::new(pcm, fps15(), opts).unwrap();

    let mut out = vec![0u8; a.bin_count()];
    for _ in 0..10 {
        a.next_snapshot(&mut out).unwrap();
    }
    let max = *out.iter().max().unwrap();
    let peak = out.iter().position(|&v| v == max).unwrap();
    assert!((99..=101).contains(&peak), "peak at bin {peak}");
    assert!(out[20] < max);
}

#[test]
fn reading_past_the_end_decays_toward_silence() {
    let opts = AnalyserOpts::default();
    let freq = 50.0 * opts.sample_rate as f32 / opts.fft_size as f32;
    let pcm = sine(freq, 0.5, 0.2, opts.sample_rate);
    let mut a = FftAnalyser::new(pcm, fps15(), opts).unwrap();
    let mut out = vec![0u8; a.bin_count()];

    a.next_snapshot(&mut out).unwrap();
    let loud = out[50];
    for _ in 0..200 {
        a.next_snapshot(&mut out).unwrap();
    }
    assert!(out[50] < loud);
}

#[test]
fn snapshot_length_must_match_bin_count() {
    let mut a = FftAnalyser::new(vec![0.0; 10], fps15(), AnalyserOpts::default()).unwrap();
    let mut out = vec![0u8; 3];
    assert!(a.next_snapshot(&mut out).is_err());
}
