//! Paceline core: tidsserie-analyse av treningsøkter.
//!
//! Rene funksjoner over ferdig innhentede, ko-indekserte strømmer – ingen
//! I/O, ingen delt tilstand. Innhenting, lagring og presentasjon hører
//! hjemme i vertsapplikasjonen.

pub mod errors;
pub mod intervals;
pub mod models;
pub mod pacing;
pub mod peaks;
pub mod quadrants;
pub mod recovery;
pub mod session;
pub mod streams;
pub mod wbal;

#[cfg(feature = "python")]
pub mod py;

pub use errors::CoreError;
pub use intervals::{segment, ThresholdKind, ZoneTable};
pub use models::{
    CoastingReport, EfDecay, FatigueReport, HrRecovery, Interval, IntervalKind, LapSplit,
    Metric, PacingLabel, PacingReport, PeakEffort, QuadrantReport, RecoveryRateEntry,
    StabilityReport, Surge, WPrimeBalance,
};
pub use session::{analyze_workout, analyze_workout_json, AthleteProfile, WorkoutReport, WorkoutStreams};
