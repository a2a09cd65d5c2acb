use crate::errors::CoreError;
use crate::models::{Metric, PeakEffort};

/// Fast katalog av standardvarigheter (label, sekunder).
pub const DURATIONS: [(&str, f64); 7] = [
    ("5s", 5.0),
    ("30s", 30.0),
    ("1m", 60.0),
    ("5m", 300.0),
    ("10m", 600.0),
    ("20m", 1200.0),
    ("60m", 3600.0),
];

/// Vinduet må dekke minst 95 % av målvarigheten (toleranse for ujevn sampling).
const SPAN_TOLERANCE: f64 = 0.95;

/// Beste rullende snitt per katalogvarighet strømmen er lang nok for.
pub fn find_peaks(time: &[f64], values: &[f64], metric: Metric) -> Result<Vec<PeakEffort>, CoreError> {
    if time.len() != values.len() {
        return Err(CoreError::LengthMismatch {
            channel: "values",
            expected: time.len(),
            got: values.len(),
        });
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let total = time[time.len() - 1] - time[0];
    let mut out = Vec::new();
    for (label, duration) in DURATIONS {
        if total < duration {
            continue;
        }
        if let Some((l, r, avg)) = best_window(time, values, duration) {
            out.push(PeakEffort {
                label: label.to_string(),
                duration_secs: duration,
                start_time: time[l],
                end_time: time[r],
                value: avg,
                metric,
            });
        }
    }
    Ok(out)
}

/// To-peker-søk: lineært per varighet, med rullende sum. Ingen prefikssummer,
/// slik at ujevn tidsakse håndteres korrekt.
fn best_window(time: &[f64], values: &[f64], target: f64) -> Option<(usize, usize, f64)> {
    let mut left = 0usize;
    let mut sum = 0.0;
    let mut best: Option<(usize, usize, f64)> = None;

    for right in 0..values.len() {
        sum += values[right];
        while time[right] - time[left] > target {
            sum -= values[left];
            left += 1;
        }
        let span = time[right] - time[left];
        if span >= SPAN_TOLERANCE * target {
            let avg = sum / (right - left + 1) as f64;
            if best.map_or(true, |b| avg > b.2) {
                best = Some((left, right, avg));
            }
        }
    }

    best
}
