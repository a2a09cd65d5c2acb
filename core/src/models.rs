use serde::{Deserialize, Serialize};

/// Hvilken kanal/metrikk en strøm representerer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Power,
    HeartRate,
    Cadence,
    Velocity,
    Pace,
}

impl Metric {
    /// Andel av oppgitt terskel som regnes som arbeid ved segmentering.
    pub fn work_factor(self) -> f64 {
        match self {
            Metric::Power => 0.75,
            Metric::HeartRate | Metric::Pace => 0.70,
            _ => 0.75,
        }
    }
}

/// Intervalltype etter relabeling (arbeid → Active, pause → Rest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalKind {
    Warmup,
    Active,
    Rest,
    Cooldown,
}

/// Klassifisert sammenhengende indeksområde over en strøm.
/// Immutabel etter produksjon; indekser refererer inn i kallerens strøm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    pub start_index: usize,
    pub end_index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    pub kind: IntervalKind,
    /// Snitt/maks av primærsignalet over indeksområdet.
    pub avg: f64,
    pub max: f64,
    /// Snitt/maks av ko-indeksert sekundærsignal (typisk puls), når satt på.
    pub avg_secondary: Option<f64>,
    pub max_secondary: Option<f64>,
    /// Sone 1..=7 – kun løst opp for effekt-deteksjon med terskel.
    pub intensity_zone: Option<u8>,
}

/// Beste rullende snitt for én katalogvarighet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeakEffort {
    pub label: String,
    pub duration_secs: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub value: f64,
    pub metric: Metric,
}

/// Fartsrykk: akselerasjonsvinduet som utløste deteksjonen.
/// `cost` er pulsstigningen i vinduet rett etter (None uten pulsstrøm).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surge {
    pub start_time: f64,
    pub duration_secs: f64,
    pub avg_velocity: f64,
    pub max_velocity: f64,
    pub cost: Option<f64>,
}

/// W'-balanse per sample (joule), med løpende minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WPrimeBalance {
    pub trace: Vec<f64>,
    pub min_balance: f64,
    pub threshold_power: f64,
    pub capacity: f64,
}

/// Pulsfall etter global makspuls (~60 s senere, eller strømslutt).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrRecovery {
    pub peak_hr: f64,
    pub peak_time: f64,
    pub hr_after: f64,
    pub drop: f64,
}

/// Puls ved slutten av et arbeidsintervall og ved faste offsett etterpå.
/// Offsett forbi strømslutt rapporteres som None.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryRateEntry {
    pub interval_end_time: f64,
    pub hr_end: f64,
    pub hr_30: Option<f64>,
    pub hr_60: Option<f64>,
    pub hr_90: Option<f64>,
    pub drop_30: Option<f64>,
    pub drop_60: Option<f64>,
    pub drop_90: Option<f64>,
}

/// EF-forfall: første mot andre halvdel av glattet EF-serie, i prosent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfDecay {
    pub first_half_ef: f64,
    pub second_half_ef: f64,
    pub decay_pct: f64,
}

/// EF første 20 % mot siste 20 % av gyldige sampler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueReport {
    pub early_ef: f64,
    pub late_ef: f64,
    pub decay_pct: f64,
    pub is_significant: bool,
}

/// Variasjonskoeffisient (stddev/mean) for ett arbeidsintervall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCov {
    pub start_time: f64,
    pub cov: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StabilityReport {
    pub overall_cov: Option<f64>,
    pub work_covs: Vec<WorkCov>,
}

/// Frihjuling: i bevegelse men uten tråkk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoastingReport {
    pub coasting_secs: f64,
    pub coasting_pct: f64,
    pub events: usize,
}

/// Kvadrantfordeling av (watt, tråkkfrekvens) mot terskel og mål-frekvens.
/// Tellinger er sekunder ved nominell 1 Hz-sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantReport {
    pub high_power_high_cadence_secs: usize,
    pub high_power_low_cadence_secs: usize,
    pub low_power_low_cadence_secs: usize,
    pub low_power_high_cadence_secs: usize,
    pub high_power_high_cadence_pct: f64,
    pub high_power_low_cadence_pct: f64,
    pub low_power_low_cadence_pct: f64,
    pub low_power_high_cadence_pct: f64,
    pub valid_samples: usize,
}

/// Fast-distanse-runde med pace i sek/km.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LapSplit {
    pub lap: usize,
    pub distance_m: f64,
    pub time_secs: f64,
    pub pace_secs_per_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingLabel {
    Even,
    SlightlyUneven,
    PositiveSplit,
    NegativeSplit,
    InsufficientData,
}

/// Pacing-dom: klassifisering + jevnhetsscore 0–100 + halvdels-pacer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingReport {
    pub label: PacingLabel,
    pub evenness: f64,
    pub first_half_pace: Option<f64>,
    pub second_half_pace: Option<f64>,
}
