use paceline_core::session::{analyze_workout, analyze_workout_json, AthleteProfile, WorkoutStreams};
use paceline_core::CoreError;

/// 700 s syntetisk økt: rolig – hardt – rolig, alle kanaler befolket.
fn synthetic() -> WorkoutStreams {
    let mut watts = vec![100.0; 200];
    watts.extend(vec![300.0; 300]);
    watts.extend(vec![100.0; 200]);

    let mut hr = vec![120.0; 200];
    hr.extend(vec![160.0; 300]);
    hr.extend(vec![130.0; 200]);

    let mut cadence = vec![80.0; 200];
    cadence.extend(vec![95.0; 300]);
    cadence.extend(vec![75.0; 200]);

    let mut velocity = vec![6.0; 200];
    velocity.extend(vec![9.0; 300]);
    velocity.extend(vec![5.0; 200]);

    WorkoutStreams {
        time: (0..700).map(|i| i as f64).collect(),
        watts: Some(watts),
        heartrate: Some(hr),
        cadence: Some(cadence),
        velocity: Some(velocity),
        distance: None,
        altitude: None,
    }
}

fn profile() -> AthleteProfile {
    AthleteProfile {
        ftp: Some(250.0),
        ..AthleteProfile::default()
    }
}

#[test]
fn full_report_with_all_channels() {
    let report = analyze_workout(&synthetic(), &profile()).expect("analyze");

    assert!(report.intervals.len() >= 3);
    assert!(report
        .intervals
        .iter()
        .any(|iv| iv.kind == paceline_core::IntervalKind::Active));
    assert!(!report.peak_power.is_empty());
    assert!(!report.peak_heartrate.is_empty());
    assert!(report.hr_recovery.is_some());
    assert!(report.aerobic_decoupling_pct.is_some());
    assert!(report.ef_decay.is_some());
    assert!(report.fatigue.is_some());
    assert!(report.stability.is_some());
    assert!(report.coasting.is_some());
    assert_eq!(report.recovery_rates.len(), 1);
    assert!(report.w_prime.is_some());
    assert!(report.quadrants.is_some());
    assert_eq!(report.lap_splits.len(), 5);
    assert!(report.pace_variability.is_some());
    assert!(report.avg_pace_min_per_km.is_some());
    assert!(report.pacing.is_some());
    assert_eq!(report.surges.len(), 1);
}

#[test]
fn secondary_hr_stats_ride_on_power_intervals() {
    let report = analyze_workout(&synthetic(), &profile()).expect("analyze");
    for iv in &report.intervals {
        assert!(iv.avg_secondary.is_some());
        assert!(iv.max_secondary.is_some());
    }
}

#[test]
fn power_only_session_skips_hr_analyses() {
    let mut s = synthetic();
    s.heartrate = None;
    s.cadence = None;
    s.velocity = None;

    let report = analyze_workout(&s, &profile()).expect("analyze");
    assert!(!report.intervals.is_empty());
    assert!(!report.peak_power.is_empty());
    assert!(report.w_prime.is_some());
    assert!(report.peak_heartrate.is_empty());
    assert!(report.hr_recovery.is_none());
    assert!(report.aerobic_decoupling_pct.is_none());
    assert!(report.quadrants.is_none());
    assert!(report.lap_splits.is_empty());
    assert!(report.pacing.is_none());
}

#[test]
fn hr_only_session_segments_on_heart_rate() {
    let mut s = synthetic();
    s.watts = None;
    s.cadence = None;
    s.velocity = None;
    let p = AthleteProfile {
        hr_max: Some(190.0),
        ..AthleteProfile::default()
    };

    let report = analyze_workout(&s, &p).expect("analyze");
    assert!(!report.intervals.is_empty());
    // pulssoner løses ikke opp – konvensjonsvalget ligger hos kalleren
    for iv in &report.intervals {
        assert_eq!(iv.intensity_zone, None);
    }
    assert!(report.w_prime.is_none());
    assert!(report.stability.is_none());
}

#[test]
fn missing_ftp_degrades_to_baseline_segmentation() {
    let report = analyze_workout(&synthetic(), &AthleteProfile::default()).expect("analyze");
    assert!(!report.intervals.is_empty());
    // uten FTP: ingen soner, ingen W'-modell, ingen kvadranter
    for iv in &report.intervals {
        assert_eq!(iv.intensity_zone, None);
    }
    assert!(report.w_prime.is_none());
    assert!(report.quadrants.is_none());
}

#[test]
fn channel_length_mismatch_is_a_contract_violation() {
    let mut s = synthetic();
    s.watts.as_mut().expect("watts").pop();

    let err = analyze_workout(&s, &profile()).expect_err("skal feile");
    match err {
        CoreError::LengthMismatch { channel, expected, got } => {
            assert_eq!(channel, "watts");
            assert_eq!(expected, 700);
            assert_eq!(got, 699);
        }
        other => panic!("uventet feil: {other}"),
    }
}

#[test]
fn empty_session_gives_empty_report() {
    let report =
        analyze_workout(&WorkoutStreams::default(), &AthleteProfile::default()).expect("analyze");
    assert!(report.intervals.is_empty());
    assert!(report.peak_power.is_empty());
    assert!(report.w_prime.is_none());
    assert!(report.coasting.is_none());
}

#[test]
fn json_facade_is_deterministic() {
    let streams = serde_json::to_string(&synthetic()).expect("serialize");
    let profile = r#"{"ftp":250.0}"#;

    let a = analyze_workout_json(&streams, Some(profile)).expect("json");
    let b = analyze_workout_json(&streams, Some(profile)).expect("json");
    assert_eq!(a, b);

    // rapporten skal kunne leses tilbake
    let report: paceline_core::WorkoutReport = serde_json::from_str(&a).expect("parse");
    assert!(!report.intervals.is_empty());
}

#[test]
fn json_facade_without_profile_uses_defaults() {
    let streams = serde_json::to_string(&synthetic()).expect("serialize");
    let out = analyze_workout_json(&streams, None).expect("json");
    assert!(out.contains("intervals"));
}

#[test]
fn json_parse_errors_carry_the_path() {
    let err = analyze_workout_json(r#"{"time":[0,1],"watts":"mange"}"#, None).expect_err("feil");
    let msg = err.to_string();
    assert!(msg.contains("watts"), "melding: {msg}");
}

#[test]
fn json_length_mismatch_names_the_channel() {
    let err = analyze_workout_json(r#"{"time":[0.0,1.0,2.0],"watts":[200.0,200.0]}"#, None)
        .expect_err("feil");
    assert!(err.to_string().contains("watts"));
}

#[test]
fn profile_accepts_w_prime_alias() {
    let streams = serde_json::to_string(&synthetic()).expect("serialize");
    let out = analyze_workout_json(&streams, Some(r#"{"ftp":250.0,"w_prime":15000.0}"#))
        .expect("json");
    let report: paceline_core::WorkoutReport = serde_json::from_str(&out).expect("parse");
    assert!((report.w_prime.expect("w_prime").capacity - 15_000.0).abs() < 1e-9);
}
