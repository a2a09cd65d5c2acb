use crate::errors::CoreError;
use crate::models::{LapSplit, PacingLabel, PacingReport, Surge};
use crate::streams;

/// Standard rundedistanse (meter).
pub const DEFAULT_LAP_DISTANCE_M: f64 = 1000.0;
/// Delrunde til slutt telles bare hvis mer enn dette gjenstår (meter).
const MIN_PARTIAL_LAP_M: f64 = 100.0;

/// Fartsfilter mot stopp i variabilitetsberegningen (m/s).
const PACE_MIN_V_MS: f64 = 0.5;

// Rykk-deteksjon: fart nå mot 5 sampler tilbake
const SURGE_LOOKBACK: usize = 5;
const SURGE_MIN_DELTA_MS: f64 = 1.0;
const SURGE_MIN_V_MS: f64 = 2.0;
/// Hopp etter hvert treff, så samme rykk ikke flagges flere ganger.
const SURGE_SKIP: usize = 20;
/// Kostnadsvindu rett etter rykket (sek).
const SURGE_COST_WINDOW_SECS: f64 = 30.0;

// Pacing-terskler (sek forskjell i snittpace mellom halvdelene)
const EVEN_MAX_DIFF_SECS: f64 = 5.0;
const SPLIT_DIFF_SECS: f64 = 10.0;

// Kildens fortegnskonvensjon er speilvendt i forhold til vanlig språkbruk:
// raskere andre halvdel (negativ differanse) merkes positive_split. Grenen
// bevares for kompatibilitet; skal konvensjonen rettes, bytt kun her.
const SECOND_HALF_FASTER: PacingLabel = PacingLabel::PositiveSplit;
const SECOND_HALF_SLOWER: PacingLabel = PacingLabel::NegativeSplit;

/// Runde-splitter: gå kumulativ distanse (v·dt) og send ut en split hver
/// gang et multiplum av rundedistansen krysses. Delrunde til slutt bare
/// hvis > 100 m gjenstår.
pub fn lap_splits(
    time: &[f64],
    velocity: &[f64],
    lap_distance: Option<f64>,
) -> Result<Vec<LapSplit>, CoreError> {
    if time.len() != velocity.len() {
        return Err(CoreError::LengthMismatch {
            channel: "velocity",
            expected: time.len(),
            got: velocity.len(),
        });
    }
    if time.is_empty() {
        return Ok(Vec::new());
    }

    let lap_m = lap_distance.unwrap_or(DEFAULT_LAP_DISTANCE_M);
    let mut out = Vec::new();
    let mut cum = 0.0;
    let mut next_mark = lap_m;
    let mut lap_start_t = time[0];
    let mut lap_no = 1usize;

    for i in 0..velocity.len() {
        let dt = if i == 0 { 0.0 } else { (time[i] - time[i - 1]).max(0.0) };
        cum += velocity[i].max(0.0) * dt;

        while cum >= next_mark {
            let lap_time = time[i] - lap_start_t;
            out.push(LapSplit {
                lap: lap_no,
                distance_m: lap_m,
                time_secs: lap_time,
                pace_secs_per_km: lap_time / lap_m * 1000.0,
            });
            lap_start_t = time[i];
            next_mark += lap_m;
            lap_no += 1;
        }
    }

    let remainder = cum - (next_mark - lap_m);
    if remainder > MIN_PARTIAL_LAP_M {
        let lap_time = time[time.len() - 1] - lap_start_t;
        out.push(LapSplit {
            lap: lap_no,
            distance_m: remainder,
            time_secs: lap_time,
            pace_secs_per_km: lap_time / remainder * 1000.0,
        });
    }

    Ok(out)
}

/// Standardavvik av fart over 0,5 m/s (filtrerer stopp). 0.0 uten
/// kvalifiserende sampler.
pub fn pace_variability(velocity: &[f64]) -> f64 {
    let filtered: Vec<f64> = velocity.iter().copied().filter(|v| *v > PACE_MIN_V_MS).collect();
    if filtered.is_empty() {
        return 0.0;
    }
    streams::std_dev(&filtered)
}

/// Snittpace i min/km. None uten distanse.
pub fn average_pace(total_time_secs: f64, total_distance_m: f64) -> Option<f64> {
    if total_distance_m <= 0.0 {
        return None;
    }
    Some((total_time_secs / 60.0) / (total_distance_m / 1000.0))
}

/// Pacing-dom: halvdelene deles på antall runder (første halvdel får den
/// ekstra runden ved oddetall), jevnhet = max(0, 100 − CV·3) der CV er
/// variasjonskoeffisienten over alle runde-pacer i prosent.
pub fn pacing_strategy(laps: &[LapSplit]) -> PacingReport {
    if laps.len() < 2 {
        return PacingReport {
            label: PacingLabel::InsufficientData,
            evenness: 0.0,
            first_half_pace: None,
            second_half_pace: None,
        };
    }

    let paces: Vec<f64> = laps.iter().map(|l| l.pace_secs_per_km).collect();
    let half = (laps.len() + 1) / 2;
    let first = streams::mean(&paces[..half]);
    let second = streams::mean(&paces[half..]);
    let diff = second - first;

    let m = streams::mean(&paces);
    let cv_pct = if m > 0.0 { streams::std_dev(&paces) / m * 100.0 } else { 0.0 };
    let evenness = (100.0 - cv_pct * 3.0).max(0.0);

    let label = if diff.abs() < EVEN_MAX_DIFF_SECS {
        PacingLabel::Even
    } else if diff < -SPLIT_DIFF_SECS {
        SECOND_HALF_FASTER
    } else if diff > SPLIT_DIFF_SECS {
        SECOND_HALF_SLOWER
    } else {
        PacingLabel::SlightlyUneven
    };

    PacingReport {
        label,
        evenness,
        first_half_pace: Some(first),
        second_half_pace: Some(second),
    }
}

/// Rykk-deteksjon: fart nå mot 5 sampler tilbake; flagg ved økning > 1 m/s
/// og fart > 2 m/s, hopp 20 sampler etter hvert treff.
pub fn surges(
    time: &[f64],
    velocity: &[f64],
    hr: Option<&[f64]>,
) -> Result<Vec<Surge>, CoreError> {
    if time.len() != velocity.len() {
        return Err(CoreError::LengthMismatch {
            channel: "velocity",
            expected: time.len(),
            got: velocity.len(),
        });
    }
    if let Some(h) = hr {
        if h.len() != time.len() {
            return Err(CoreError::LengthMismatch {
                channel: "heartrate",
                expected: time.len(),
                got: h.len(),
            });
        }
    }

    let mut out = Vec::new();
    let mut i = SURGE_LOOKBACK;
    while i < velocity.len() {
        let delta = velocity[i] - velocity[i - SURGE_LOOKBACK];
        if delta > SURGE_MIN_DELTA_MS && velocity[i] > SURGE_MIN_V_MS {
            let start = i - SURGE_LOOKBACK;
            let span = &velocity[start..=i];
            out.push(Surge {
                start_time: time[start],
                duration_secs: time[i] - time[start],
                avg_velocity: streams::mean(span),
                max_velocity: streams::max_of(span),
                cost: hr.and_then(|h| surge_cost(time, h, start, i)),
            });
            i += SURGE_SKIP;
        } else {
            i += 1;
        }
    }

    Ok(out)
}

/// Kostnad = snittpuls i vinduet rett etter rykket minus snittpuls under
/// rykket. None hvis ingen sampler følger etter.
fn surge_cost(time: &[f64], hr: &[f64], start: usize, end: usize) -> Option<f64> {
    let during = streams::mean(&hr[start..=end]);

    let window_end = time[end] + SURGE_COST_WINDOW_SECS;
    let mut sum = 0.0;
    let mut count = 0usize;
    for k in (end + 1)..hr.len() {
        if time[k] > window_end {
            break;
        }
        sum += hr[k];
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(sum / count as f64 - during)
}
