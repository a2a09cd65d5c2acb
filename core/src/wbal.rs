use crate::errors::CoreError;
use crate::models::WPrimeBalance;

/// Standard anaerob kapasitet (joule) når utøververdi mangler.
pub const DEFAULT_CAPACITY_J: f64 = 20_000.0;

// Skiba (2012): tau = 546 * e^(-0.01 * (CP - P)) + 316
const TAU_SCALE: f64 = 546.0;
const TAU_RATE: f64 = -0.01;
const TAU_FLOOR: f64 = 316.0;

/// W'-balanse per sample: lineær tapping over terskel, eksponentiell
/// gjenoppladning mot full kapasitet under. Clamp til kapasitet skjer ETTER
/// hver oppdatering – rekkefølgen endrer sporet ved kapasitetsgrensen og må
/// bevares. dt faller tilbake til 1 s for første sample / ujevn tidsakse.
pub fn w_prime_balance(
    time: &[f64],
    power: &[f64],
    threshold_power: f64,
    capacity: Option<f64>,
) -> Result<Option<WPrimeBalance>, CoreError> {
    if time.len() != power.len() {
        return Err(CoreError::LengthMismatch {
            channel: "watts",
            expected: time.len(),
            got: power.len(),
        });
    }
    if power.is_empty() {
        return Ok(None);
    }

    let capacity = capacity.unwrap_or(DEFAULT_CAPACITY_J);
    let mut balance = capacity;
    let mut min_balance = capacity;
    let mut trace = Vec::with_capacity(power.len());

    for i in 0..power.len() {
        let dt = if i == 0 {
            1.0
        } else {
            let d = time[i] - time[i - 1];
            if d > 0.0 { d } else { 1.0 }
        };

        let p = power[i];
        if p > threshold_power {
            balance -= (p - threshold_power) * dt;
        } else {
            let tau = TAU_SCALE * (TAU_RATE * (threshold_power - p)).exp() + TAU_FLOOR;
            balance = capacity - (capacity - balance) * (-dt / tau).exp();
        }
        balance = balance.min(capacity);

        if balance < min_balance {
            min_balance = balance;
        }
        trace.push(balance);
    }

    Ok(Some(WPrimeBalance {
        trace,
        min_balance,
        threshold_power,
        capacity,
    }))
}
