use crate::errors::CoreError;
use crate::models::QuadrantReport;

/// Standard mål-tråkkfrekvens (rpm).
pub const DEFAULT_TARGET_CADENCE: f64 = 90.0;

// Under begge disse regnes samplet som frihjuling/stopp og ekskluderes
const EXCLUDE_CADENCE: f64 = 10.0;
const EXCLUDE_POWER: f64 = 10.0;

/// Kvadrantfordeling av (watt, tråkkfrekvens) mot terskeleffekt og
/// mål-frekvens. None hvis ingen gyldige sampler.
pub fn quadrants(
    power: &[f64],
    cadence: &[f64],
    threshold_power: f64,
    target_cadence: Option<f64>,
) -> Result<Option<QuadrantReport>, CoreError> {
    if power.len() != cadence.len() {
        return Err(CoreError::LengthMismatch {
            channel: "cadence",
            expected: power.len(),
            got: cadence.len(),
        });
    }

    let target = target_cadence.unwrap_or(DEFAULT_TARGET_CADENCE);
    let mut counts = [0usize; 4]; // hphc, hplc, lplc, lphc
    let mut valid = 0usize;

    for (p, c) in power.iter().zip(cadence.iter()) {
        if *c < EXCLUDE_CADENCE && *p < EXCLUDE_POWER {
            continue;
        }
        valid += 1;
        let high_power = *p >= threshold_power;
        let high_cadence = *c >= target;
        let q = match (high_power, high_cadence) {
            (true, true) => 0,
            (true, false) => 1,
            (false, false) => 2,
            (false, true) => 3,
        };
        counts[q] += 1;
    }

    if valid == 0 {
        return Ok(None);
    }

    let pct = |n: usize| n as f64 * 100.0 / valid as f64;
    Ok(Some(QuadrantReport {
        high_power_high_cadence_secs: counts[0],
        high_power_low_cadence_secs: counts[1],
        low_power_low_cadence_secs: counts[2],
        low_power_high_cadence_secs: counts[3],
        high_power_high_cadence_pct: pct(counts[0]),
        high_power_low_cadence_pct: pct(counts[1]),
        low_power_low_cadence_pct: pct(counts[2]),
        low_power_high_cadence_pct: pct(counts[3]),
        valid_samples: valid,
    }))
}
