use paceline_core::models::Metric;
use paceline_core::peaks::find_peaks;

fn one_hz(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

#[test]
fn constant_stream_peaks_equal_the_constant() {
    // 120 s @ 1 Hz: kvalifiserer for 5s/30s/1m
    let v = vec![250.0; 120];
    let t = one_hz(v.len());

    let peaks = find_peaks(&t, &v, Metric::Power).expect("find_peaks");
    assert_eq!(peaks.len(), 3);
    for p in &peaks {
        assert!((p.value - 250.0).abs() < 1e-9, "{}: {}", p.label, p.value);
        // vinduet skal dekke minst 95 % av målvarigheten
        assert!(p.end_time - p.start_time >= 0.95 * p.duration_secs);
    }
}

#[test]
fn only_qualifying_durations_are_reported() {
    let v = vec![200.0; 20]; // 19 s totalt → bare 5s-vinduet
    let t = one_hz(v.len());
    let peaks = find_peaks(&t, &v, Metric::Power).expect("find_peaks");
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].label, "5s");
}

#[test]
fn ramp_peak_sits_at_the_end() {
    let v = one_hz(120); // stigende 0..119
    let t = one_hz(120);
    let peaks = find_peaks(&t, &v, Metric::Power).expect("find_peaks");

    let p5 = peaks.iter().find(|p| p.label == "5s").expect("5s");
    // beste 5 s-vindu er de siste 6 samplene: snitt av 114..=119
    assert!((p5.value - 116.5).abs() < 1e-9);
    assert!((p5.end_time - 119.0).abs() < 1e-9);
}

#[test]
fn empty_stream_gives_empty_list() {
    let peaks = find_peaks(&[], &[], Metric::Power).expect("find_peaks");
    assert!(peaks.is_empty());
}

#[test]
fn length_mismatch_fails_fast() {
    let t = one_hz(10);
    let v = vec![100.0; 9];
    assert!(find_peaks(&t, &v, Metric::Power).is_err());
}
