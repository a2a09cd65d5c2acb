use thiserror::Error;

/// Feiltyper for kjernen. Manglende data er IKKE en feil – analysene
/// returnerer None/tomt ved for lite data. Kun kontraktsbrudd (ulik
/// strømlengde) og parse-feil i JSON-grensesnittet havner her.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("length_mismatch: kanal '{channel}' har {got} samples, forventet {expected}")]
    LengthMismatch {
        channel: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("json_parse: {0}")]
    Json(String),
}
