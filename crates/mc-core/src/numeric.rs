use crate::McError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, McError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(McError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive, e.g. an absolute temperature or a length.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, McError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(McError::NonPositive { what, value: v })
    }
}

/// `n` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
