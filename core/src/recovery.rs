use crate::errors::CoreError;
use crate::models::{
    CoastingReport, EfDecay, FatigueReport, HrRecovery, Interval, IntervalKind,
    RecoveryRateEntry, StabilityReport, WorkCov,
};
use crate::streams;

/// Gyldighetsfiltre mot stopp/støy.
const MIN_POWER_W: f64 = 10.0;
const MIN_HR_BPM: f64 = 40.0;

/// Minste antall gyldige sampler for frakobling (~10 min ved 1 Hz).
const DECOUPLING_MIN_VALID: usize = 600;
/// Gulv for fatigue-analysen: rå sampler og gyldige sampler.
const FATIGUE_MIN_RAW: usize = 600;
const FATIGUE_MIN_VALID: usize = 100;
/// |forfall| over dette regnes som signifikant (%).
const FATIGUE_SIGNIFICANT_PCT: f64 = 5.0;

/// Glattevindu for EF-forfallskurven (samples ≈ sekunder ved 1 Hz).
const EF_SMOOTH_WINDOW: usize = 300;

/// Offsett for pulsfall etter makspuls (sek).
const HRR_OFFSET_SECS: f64 = 60.0;
/// Offsett for restitusjonstrend etter arbeidsintervall (sek).
const TREND_OFFSETS: [f64; 3] = [30.0, 60.0, 90.0];

/// Bevegelses-/tråkkdefinisjoner for frihjuling.
const MOVING_MIN_V_MS: f64 = 2.0;
const PEDALING_MIN_CADENCE: f64 = 20.0;

/// Pulsfall: global makspuls mot pulsen ~60 s senere (eller strømslutt).
pub fn hr_recovery(time: &[f64], hr: &[f64]) -> Result<Option<HrRecovery>, CoreError> {
    if time.len() != hr.len() {
        return Err(CoreError::LengthMismatch {
            channel: "heartrate",
            expected: time.len(),
            got: hr.len(),
        });
    }
    if hr.is_empty() {
        return Ok(None);
    }

    let mut peak_i = 0usize;
    for i in 1..hr.len() {
        if hr[i] > hr[peak_i] {
            peak_i = i;
        }
    }

    // Første sample ved/etter offsettet, ellers siste sample
    let target = time[peak_i] + HRR_OFFSET_SECS;
    let mut j = peak_i;
    for k in peak_i..time.len() {
        j = k;
        if time[k] >= target {
            break;
        }
    }

    let after = hr[j];
    Ok(Some(HrRecovery {
        peak_hr: hr[peak_i],
        peak_time: time[peak_i],
        hr_after: after,
        drop: hr[peak_i] - after,
    }))
}

/// Aerob frakobling: EF (snittwatt/snittpuls) første mot andre halvdel av
/// gyldige par, som prosent av EF1. None under datagulvet.
pub fn aerobic_decoupling(watts: &[f64], hr: &[f64]) -> Result<Option<f64>, CoreError> {
    if watts.len() != hr.len() {
        return Err(CoreError::LengthMismatch {
            channel: "heartrate",
            expected: watts.len(),
            got: hr.len(),
        });
    }

    let valid: Vec<(f64, f64)> = watts
        .iter()
        .zip(hr.iter())
        .filter(|(p, h)| **p > MIN_POWER_W && **h > MIN_HR_BPM)
        .map(|(p, h)| (*p, *h))
        .collect();
    if valid.len() < DECOUPLING_MIN_VALID {
        return Ok(None);
    }

    let mid = valid.len() / 2;
    let ef1 = efficiency_factor(&valid[..mid]);
    let ef2 = efficiency_factor(&valid[mid..]);
    match (ef1, ef2) {
        (Some(a), Some(b)) if a > 0.0 => Ok(Some((a - b) / a * 100.0)),
        _ => Ok(None),
    }
}

fn efficiency_factor(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let mut sum_p = 0.0;
    let mut sum_h = 0.0;
    for (p, h) in pairs {
        sum_p += p;
        sum_h += h;
    }
    if sum_h <= 0.0 {
        return None;
    }
    Some(sum_p / sum_h)
}

/// EF-forfallskurve: per-sample EF (puls > 40) glattet med 300 s sentrert
/// vindu, deretter første mot andre halvdel med samme (EF1−EF2)/EF1-konvensjon.
pub fn ef_decay(watts: &[f64], hr: &[f64]) -> Result<Option<EfDecay>, CoreError> {
    if watts.len() != hr.len() {
        return Err(CoreError::LengthMismatch {
            channel: "heartrate",
            expected: watts.len(),
            got: hr.len(),
        });
    }

    let ef: Vec<f64> = watts
        .iter()
        .zip(hr.iter())
        .filter(|(_, h)| **h > MIN_HR_BPM)
        .map(|(p, h)| p / h)
        .collect();
    if ef.len() < 2 {
        return Ok(None);
    }

    let smoothed = streams::smooth(&ef, EF_SMOOTH_WINDOW);
    let mid = smoothed.len() / 2;
    let first = streams::mean(&smoothed[..mid]);
    let second = streams::mean(&smoothed[mid..]);
    if first <= 0.0 {
        return Ok(None);
    }

    Ok(Some(EfDecay {
        first_half_ef: first,
        second_half_ef: second,
        decay_pct: (first - second) / first * 100.0,
    }))
}

/// Fatigue-sensitivitet: EF over første mot siste 20 % av gyldige sampler.
/// Krever ≥600 rå og ≥100 gyldige sampler.
pub fn fatigue_sensitivity(watts: &[f64], hr: &[f64]) -> Result<Option<FatigueReport>, CoreError> {
    if watts.len() != hr.len() {
        return Err(CoreError::LengthMismatch {
            channel: "heartrate",
            expected: watts.len(),
            got: hr.len(),
        });
    }
    if watts.len() < FATIGUE_MIN_RAW {
        return Ok(None);
    }

    let valid: Vec<(f64, f64)> = watts
        .iter()
        .zip(hr.iter())
        .filter(|(p, h)| **p > MIN_POWER_W && **h > MIN_HR_BPM)
        .map(|(p, h)| (*p, *h))
        .collect();
    if valid.len() < FATIGUE_MIN_VALID {
        return Ok(None);
    }

    let fifth = (valid.len() / 5).max(1);
    let early = efficiency_factor(&valid[..fifth]);
    let late = efficiency_factor(&valid[valid.len() - fifth..]);
    match (early, late) {
        (Some(a), Some(b)) if a > 0.0 => {
            let decay_pct = (a - b) / a * 100.0;
            Ok(Some(FatigueReport {
                early_ef: a,
                late_ef: b,
                decay_pct,
                is_significant: decay_pct.abs() > FATIGUE_SIGNIFICANT_PCT,
            }))
        }
        _ => Ok(None),
    }
}

/// Stabilitet: variasjonskoeffisient (stddev/mean) over verdier > 10,
/// totalt og per arbeidsintervall. Intervallisten kommer fra segmentereren –
/// segmentér én gang, send listen videre hit.
pub fn stability(values: &[f64], intervals: &[Interval]) -> StabilityReport {
    let mut report = StabilityReport {
        overall_cov: cov_over(values),
        work_covs: Vec::new(),
    };

    for iv in intervals {
        if iv.kind != IntervalKind::Active || iv.end_index >= values.len() {
            continue;
        }
        if let Some(cov) = cov_over(&values[iv.start_index..=iv.end_index]) {
            report.work_covs.push(WorkCov {
                start_time: iv.start_time,
                cov,
            });
        }
    }

    report
}

fn cov_over(values: &[f64]) -> Option<f64> {
    let filtered: Vec<f64> = values.iter().copied().filter(|v| *v > 10.0).collect();
    if filtered.is_empty() {
        return None;
    }
    let m = streams::mean(&filtered);
    if m <= 0.0 {
        return None;
    }
    Some(streams::std_dev(&filtered) / m)
}

/// Frihjuling: i bevegelse (v > 2 m/s, eller antatt i bevegelse uten
/// fartsstrøm) men uten tråkk (kadens > 20 hvis tilgjengelig, ellers
/// watt > 10 som fallback-definisjon av tråkk). None hvis verken kadens
/// eller watt finnes – da er tråkk udefinert.
pub fn coasting(
    time: &[f64],
    velocity: Option<&[f64]>,
    cadence: Option<&[f64]>,
    watts: Option<&[f64]>,
) -> Result<Option<CoastingReport>, CoreError> {
    let n = time.len();
    for (name, ch) in [("velocity", velocity), ("cadence", cadence), ("watts", watts)] {
        if let Some(v) = ch {
            if v.len() != n {
                return Err(CoreError::LengthMismatch {
                    channel: name,
                    expected: n,
                    got: v.len(),
                });
            }
        }
    }
    if n == 0 || (cadence.is_none() && watts.is_none()) {
        return Ok(None);
    }

    let total = time[n - 1] - time[0];
    let mut secs = 0.0;
    let mut events = 0usize;
    let mut prev_coasting = false;

    for i in 0..n {
        let dt = if i == 0 { 0.0 } else { (time[i] - time[i - 1]).max(0.0) };

        let moving = velocity.map_or(true, |v| v[i] > MOVING_MIN_V_MS);
        let pedaling = match (cadence, watts) {
            (Some(c), _) => c[i] > PEDALING_MIN_CADENCE,
            (None, Some(w)) => w[i] > MIN_POWER_W,
            (None, None) => unreachable!(),
        };

        let is_coasting = moving && !pedaling;
        if is_coasting {
            secs += dt;
            if !prev_coasting {
                events += 1;
            }
        }
        prev_coasting = is_coasting;
    }

    Ok(Some(CoastingReport {
        coasting_secs: secs,
        coasting_pct: if total > 0.0 { secs / total * 100.0 } else { 0.0 },
        events,
    }))
}

/// Restitusjonstrend: puls ved slutten av hvert arbeidsintervall og ved
/// +30/+60/+90 s, med fall. Kjøres ETTER segmentering, på samme intervalliste
/// som stabilitetsanalysen (konsistente grenser).
pub fn recovery_rates(
    time: &[f64],
    hr: &[f64],
    intervals: &[Interval],
) -> Result<Vec<RecoveryRateEntry>, CoreError> {
    if time.len() != hr.len() {
        return Err(CoreError::LengthMismatch {
            channel: "heartrate",
            expected: time.len(),
            got: hr.len(),
        });
    }

    let mut out = Vec::new();
    for iv in intervals {
        if iv.kind != IntervalKind::Active || iv.end_index >= hr.len() {
            continue;
        }
        let end_i = iv.end_index;
        let hr_end = hr[end_i];

        let mut at_offset = [None; 3];
        for (oi, offset) in TREND_OFFSETS.iter().enumerate() {
            let target = time[end_i] + offset;
            for k in end_i..time.len() {
                if time[k] >= target {
                    at_offset[oi] = Some(hr[k]);
                    break;
                }
            }
        }

        out.push(RecoveryRateEntry {
            interval_end_time: time[end_i],
            hr_end,
            hr_30: at_offset[0],
            hr_60: at_offset[1],
            hr_90: at_offset[2],
            drop_30: at_offset[0].map(|h| hr_end - h),
            drop_60: at_offset[1].map(|h| hr_end - h),
            drop_90: at_offset[2].map(|h| hr_end - h),
        });
    }

    Ok(out)
}
