//! Short-horizon volatility estimate

/// Sample standard deviation of close-to-close percentage changes, in percent.
///
/// Needs at least two returns; anything shorter or non-finite yields 0.0.
pub fn close_to_close_volatility(closes: &[f64]) -> f64 {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let volatility = variance.sqrt() * 100.0;

    if volatility.is_finite() {
        volatility
    } else {
        0.0
    }
}

/// Volatility over the most recent `window` closes
pub fn windowed_volatility(closes: &[f64], window: usize) -> f64 {
    let start = closes.len().saturating_sub(window);
    close_to_close_volatility(&closes[start..])
}
