use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::intervals::{self, ThresholdKind, ZoneTable};
use crate::models::{
    CoastingReport, EfDecay, FatigueReport, HrRecovery, Interval, LapSplit, Metric,
    PacingReport, PeakEffort, QuadrantReport, RecoveryRateEntry, StabilityReport, Surge,
    WPrimeBalance,
};
use crate::{pacing, peaks, quadrants, recovery, wbal};

static ANALYSES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "paceline_analyses_total",
        "Antall kjørte analyser per analysator",
        &["analyzer"]
    )
    .expect("prometheus-registrering")
});

#[inline]
fn count(analyzer: &str) {
    ANALYSES_TOTAL.with_label_values(&[analyzer]).inc();
}

/// Ko-indekserte kanalstrømmer fra innhentings-laget. Kanaler er enten
/// fraværende eller fullt befolket – aldri null-paddet. Alle tilstedeværende
/// kanaler må ha samme lengde som `time`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutStreams {
    pub time: Vec<f64>,
    #[serde(default)]
    pub watts: Option<Vec<f64>>,
    #[serde(default)]
    pub heartrate: Option<Vec<f64>>,
    #[serde(default)]
    pub cadence: Option<Vec<f64>>,
    #[serde(default)]
    pub velocity: Option<Vec<f64>>,
    #[serde(default)]
    pub distance: Option<Vec<f64>>,
    #[serde(default)]
    pub altitude: Option<Vec<f64>>,
}

/// Utøverterskler fra profil-laget. Alt er valgfritt; analysene degraderer
/// (hopper over eller bruker auto-baseline) når verdier mangler.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AthleteProfile {
    #[serde(default)]
    pub ftp: Option<f64>,
    #[serde(default)]
    pub hr_max: Option<f64>,
    #[serde(default, alias = "w_prime")]
    pub w_prime_capacity: Option<f64>,
    /// Konvensjon for en eventuell pulsterskel (se intervals::ThresholdKind).
    #[serde(default)]
    pub threshold_kind: ThresholdKind,
}

/// Samlet analyserapport – rene verdityper, klare for serialisering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutReport {
    pub intervals: Vec<Interval>,
    pub peak_power: Vec<PeakEffort>,
    pub peak_heartrate: Vec<PeakEffort>,
    pub hr_recovery: Option<HrRecovery>,
    pub aerobic_decoupling_pct: Option<f64>,
    pub ef_decay: Option<EfDecay>,
    pub fatigue: Option<FatigueReport>,
    pub stability: Option<StabilityReport>,
    pub coasting: Option<CoastingReport>,
    pub recovery_rates: Vec<RecoveryRateEntry>,
    pub w_prime: Option<WPrimeBalance>,
    pub quadrants: Option<QuadrantReport>,
    pub lap_splits: Vec<LapSplit>,
    pub pace_variability: Option<f64>,
    pub avg_pace_min_per_km: Option<f64>,
    pub pacing: Option<PacingReport>,
    pub surges: Vec<Surge>,
}

/// Kjør alle analyser kanalene gir grunnlag for. Ulik kanallengde er et
/// kontraktsbrudd og feiler raskt; for lite data i en enkeltanalyse gir
/// None/tomt i rapporten.
pub fn analyze_workout(
    streams: &WorkoutStreams,
    profile: &AthleteProfile,
) -> Result<WorkoutReport, CoreError> {
    validate(streams)?;

    let t = &streams.time;
    let mut report = WorkoutReport::default();

    // Segmentering: watt hvis tilgjengelig, ellers puls (terskel = hr_max
    // skalert med arbeidsfaktoren 0.70; konvensjonsvalget ligger i profilen)
    if let Some(w) = &streams.watts {
        let zones = profile.ftp.map(ZoneTable::power_from_ftp);
        report.intervals = intervals::segment(t, w, Metric::Power, profile.ftp, zones.as_ref())?;
        if let Some(h) = &streams.heartrate {
            intervals::with_secondary(&mut report.intervals, h);
        }
        count("intervals");
    } else if let Some(h) = &streams.heartrate {
        report.intervals = intervals::segment(t, h, Metric::HeartRate, profile.hr_max, None)?;
        count("intervals");
    }
    log::debug!("segmentering ga {} intervaller", report.intervals.len());

    if let Some(w) = &streams.watts {
        report.peak_power = peaks::find_peaks(t, w, Metric::Power)?;
        count("peaks");
        report.stability = Some(recovery::stability(w, &report.intervals));
        count("stability");
        if let Some(ftp) = profile.ftp {
            report.w_prime = wbal::w_prime_balance(t, w, ftp, profile.w_prime_capacity)?;
            count("w_prime");
        }
    }

    if let Some(h) = &streams.heartrate {
        report.peak_heartrate = peaks::find_peaks(t, h, Metric::HeartRate)?;
        report.hr_recovery = recovery::hr_recovery(t, h)?;
        report.recovery_rates = recovery::recovery_rates(t, h, &report.intervals)?;
        count("recovery");
        if let Some(w) = &streams.watts {
            report.aerobic_decoupling_pct = recovery::aerobic_decoupling(w, h)?;
            report.ef_decay = recovery::ef_decay(w, h)?;
            report.fatigue = recovery::fatigue_sensitivity(w, h)?;
            count("decoupling");
        }
    }

    report.coasting = recovery::coasting(
        t,
        streams.velocity.as_deref(),
        streams.cadence.as_deref(),
        streams.watts.as_deref(),
    )?;

    if let (Some(w), Some(c), Some(ftp)) = (&streams.watts, &streams.cadence, profile.ftp) {
        report.quadrants = quadrants::quadrants(w, c, ftp, None)?;
        count("quadrants");
    }

    if let Some(v) = &streams.velocity {
        report.lap_splits = pacing::lap_splits(t, v, None)?;
        report.pace_variability = Some(pacing::pace_variability(v));
        report.pacing = Some(pacing::pacing_strategy(&report.lap_splits));
        report.surges = pacing::surges(t, v, streams.heartrate.as_deref())?;

        let total_time = if t.is_empty() { 0.0 } else { t[t.len() - 1] - t[0] };
        report.avg_pace_min_per_km = pacing::average_pace(total_time, total_distance(streams));
        count("pacing");
    }

    Ok(report)
}

/// JSON inn/ut-grensesnitt for verter som ikke snakker Rust-typer.
/// Parse-feil rapporteres med sti (serde_path_to_error).
pub fn analyze_workout_json(
    streams_json: &str,
    profile_json: Option<&str>,
) -> Result<String, CoreError> {
    let streams: WorkoutStreams = parse_json(streams_json)?;
    let profile: AthleteProfile = match profile_json {
        Some(p) => parse_json(p)?,
        None => AthleteProfile::default(),
    };
    let report = analyze_workout(&streams, &profile)?;
    serde_json::to_string(&report).map_err(|e| CoreError::Json(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(s: &str) -> Result<T, CoreError> {
    let de = &mut serde_json::Deserializer::from_str(s);
    serde_path_to_error::deserialize(de)
        .map_err(|e| CoreError::Json(format!("{} (ved {})", e.inner(), e.path())))
}

/// Alle tilstedeværende kanaler må være ko-indeksert med time.
fn validate(streams: &WorkoutStreams) -> Result<(), CoreError> {
    let n = streams.time.len();
    let channels: [(&'static str, Option<&Vec<f64>>); 6] = [
        ("watts", streams.watts.as_ref()),
        ("heartrate", streams.heartrate.as_ref()),
        ("cadence", streams.cadence.as_ref()),
        ("velocity", streams.velocity.as_ref()),
        ("distance", streams.distance.as_ref()),
        ("altitude", streams.altitude.as_ref()),
    ];
    for (name, ch) in channels {
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
    Ok(())
}

/// Total distanse: distansestrømmen hvis den finnes, ellers integrert v·dt.
fn total_distance(streams: &WorkoutStreams) -> f64 {
    if let Some(d) = &streams.distance {
        if d.len() >= 2 {
            return (d[d.len() - 1] - d[0]).max(0.0);
        }
    }
    let (t, v) = match &streams.velocity {
        Some(v) => (&streams.time, v),
        None => return 0.0,
    };
    let mut cum = 0.0;
    for i in 1..v.len() {
        cum += v[i].max(0.0) * (t[i] - t[i - 1]).max(0.0);
    }
    cum
}
