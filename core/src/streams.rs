use ordered_float::OrderedFloat;

/// Sentrert glidende snitt. Vinduet krymper mot kantene (ingen padding,
/// ingen wrap). Ikke-finite verdier bidrar med 0 i summen men teller i
/// nevneren – bevart oppførsel fra referansen, påvirker kantnøyaktighet.
pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }
    let k = window / 2;
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let a = i.saturating_sub(k);
        let b = (i + k + 1).min(values.len());
        let mut s = 0.0;
        for j in a..b {
            if values[j].is_finite() {
                s += values[j];
            }
        }
        out.push(s / (b - a) as f64);
    }

    out
}

/// Median av strengt positive verdier; 0.0 hvis ingen finnes.
/// Brukes som automatisk arbeidsterskel når utøverterskel mangler.
pub fn baseline(values: &[f64]) -> f64 {
    let mut pos: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    if pos.is_empty() {
        return 0.0;
    }
    pos.sort_by_key(|v| OrderedFloat(*v));
    let n = pos.len();
    if n % 2 == 1 {
        pos[n / 2]
    } else {
        (pos[n / 2 - 1] + pos[n / 2]) / 2.0
    }
}

/// Trygg indeksert tilgang – 0.0 utenfor rekkevidde.
#[inline]
pub fn at(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(0.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Populasjons-stddev (ikke utvalg).
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

#[inline]
pub fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
