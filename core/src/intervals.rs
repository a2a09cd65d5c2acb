use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::{Interval, IntervalKind, Metric};
use crate::streams;

/// Glattevindu for deteksjon (samples ≈ sekunder ved 1 Hz).
pub const SMOOTH_WINDOW: usize = 10;
/// Minste varighet for et arbeidsintervall (sek).
pub const MIN_WORK_SECS: f64 = 30.0;
/// Kortere pauser enn dette slås sammen med arbeidet rundt (sek).
pub const MIN_RECOVERY_SECS: f64 = 15.0;

/// Hvilken konvensjon en oppgitt pulsterskel følger. Sonetabell for puls er
/// bevisst ikke implementert: LTHR- og makspuls-konvensjonene gir ulike
/// soner, og kilden skiller ikke mellom dem. Default er Lthr;
/// `intensity_zone` forblir None for puls-deteksjoner uansett.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    #[default]
    Lthr,
    MaxHr,
}

/// Effektsoner avledet av FTP (klassisk 7-soners tabell).
/// Eksplisitt parameter til segmentereren – ingen global sonekonfig.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneTable {
    /// Øvre grenser i watt, stigende. Verdier over siste grense = øverste sone.
    upper_bounds: Vec<f64>,
}

impl ZoneTable {
    pub fn power_from_ftp(ftp: f64) -> Self {
        let fractions = [0.55, 0.75, 0.90, 1.05, 1.20, 1.50];
        Self {
            upper_bounds: fractions.iter().map(|f| f * ftp).collect(),
        }
    }

    /// Sone 1..=7 for en gitt watt-verdi.
    pub fn zone_for(&self, watts: f64) -> u8 {
        for (i, ub) in self.upper_bounds.iter().enumerate() {
            if watts <= *ub {
                return (i + 1) as u8;
            }
        }
        (self.upper_bounds.len() + 1) as u8
    }
}

/// Skannertilstand – tagget variant i stedet for løse bool-flagg.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    Idle,
    InWork { start: usize },
}

/// Terskelbasert segmentering i warmup/arbeid/pause/cooldown.
///
/// 1) glatt signalet (10 s-vindu)
/// 2) terskel = oppgitt terskel × arbeidsfaktor, ellers baseline av glattet serie
/// 3) kandidat-spenn fra stigende/fallende flanker, forkast < 30 s
/// 4) slå sammen kandidater med gap < 15 s (korte dupp i arbeidet)
/// 5) merk gap før/mellom/etter kandidatene; kun ikke-tomme gap sendes ut
///
/// Tom strøm gir deterministisk tom liste. Et intervall som fortsatt er
/// åpent ved strømslutt sjekkes mot samme 30 s-minimum før flush.
pub fn segment(
    time: &[f64],
    values: &[f64],
    metric: Metric,
    threshold: Option<f64>,
    zones: Option<&ZoneTable>,
) -> Result<Vec<Interval>, CoreError> {
    if time.len() != values.len() {
        return Err(CoreError::LengthMismatch {
            channel: "values",
            expected: time.len(),
            got: values.len(),
        });
    }
    if time.is_empty() {
        return Ok(Vec::new());
    }

    let smoothed = streams::smooth(values, SMOOTH_WINDOW);
    let base = match threshold {
        Some(t) => t,
        None => streams::baseline(&smoothed),
    };
    let work_threshold = base * metric.work_factor();

    // Kandidat-spenn via flankedeteksjon
    let mut candidates: Vec<(usize, usize)> = Vec::new();
    let mut state = ScanState::Idle;
    for (i, v) in smoothed.iter().enumerate() {
        let is_work = *v >= work_threshold;
        state = match (state, is_work) {
            (ScanState::Idle, true) => ScanState::InWork { start: i },
            (ScanState::InWork { start }, false) => {
                push_candidate(&mut candidates, time, start, i - 1);
                ScanState::Idle
            }
            (s, _) => s,
        };
    }
    if let ScanState::InWork { start } = state {
        push_candidate(&mut candidates, time, start, smoothed.len() - 1);
    }

    // Merge: gap under minste pausevarighet absorberes i arbeidet
    let mut merged: Vec<(usize, usize)> = Vec::new();
    for (s, e) in candidates {
        match merged.last_mut() {
            Some((_, prev_end)) if time[s] - time[*prev_end] < MIN_RECOVERY_SECS => {
                *prev_end = e;
            }
            _ => merged.push((s, e)),
        }
    }

    log::debug!(
        "segmentering ({:?}): terskel {:.1}, {} kandidater etter merge",
        metric,
        work_threshold,
        merged.len()
    );

    // Gå gjennom i rekkefølge og merk gap + arbeid
    let n = time.len();
    let mut out = Vec::new();
    let mut cursor = 0usize;
    for (idx, (s, e)) in merged.iter().copied().enumerate() {
        if s > cursor {
            let kind = if idx == 0 {
                IntervalKind::Warmup
            } else {
                IntervalKind::Rest
            };
            out.push(make_interval(time, values, cursor, s - 1, kind, metric, threshold, zones));
        }
        out.push(make_interval(time, values, s, e, IntervalKind::Active, metric, threshold, zones));
        cursor = e + 1;
    }
    if !merged.is_empty() && cursor < n {
        out.push(make_interval(
            time,
            values,
            cursor,
            n - 1,
            IntervalKind::Cooldown,
            metric,
            threshold,
            zones,
        ));
    }

    Ok(out)
}

/// Legg på snitt/maks fra en ko-indeksert sekundærstrøm (typisk puls).
pub fn with_secondary(intervals: &mut [Interval], secondary: &[f64]) {
    for iv in intervals.iter_mut() {
        if iv.end_index < secondary.len() {
            let slice = &secondary[iv.start_index..=iv.end_index];
            iv.avg_secondary = Some(streams::mean(slice));
            iv.max_secondary = Some(streams::max_of(slice));
        }
    }
}

fn push_candidate(candidates: &mut Vec<(usize, usize)>, time: &[f64], start: usize, end: usize) {
    if time[end] - time[start] >= MIN_WORK_SECS {
        candidates.push((start, end));
    }
}

#[allow(clippy::too_many_arguments)]
fn make_interval(
    time: &[f64],
    values: &[f64],
    start: usize,
    end: usize,
    kind: IntervalKind,
    metric: Metric,
    threshold: Option<f64>,
    zones: Option<&ZoneTable>,
) -> Interval {
    let slice = &values[start..=end];
    let avg = streams::mean(slice);
    let max = streams::max_of(slice);

    // Sonetabell er kun koblet for effekt; puls-soner er et åpent valg (LTHR
    // vs makspuls) og løses ikke opp her.
    let intensity_zone = match (metric, threshold, zones) {
        (Metric::Power, Some(_), Some(z)) => Some(z.zone_for(avg)),
        _ => None,
    };

    Interval {
        start_index: start,
        end_index: end,
        start_time: time[start],
        end_time: time[end],
        duration: time[end] - time[start],
        kind,
        avg,
        max,
        avg_secondary: None,
        max_secondary: None,
        intensity_zone,
    }
}
