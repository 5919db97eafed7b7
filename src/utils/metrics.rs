//! Image comparison metrics
//!
//! Used to score a reconstruction against a reference image.

/// Root-mean-square error between two arrays
pub fn rmse(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = a.iter().zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum();
    (sum_sq / a.len() as f64).sqrt()
}

/// RMSE normalized by the range of the reference `b`
pub fn nrmse(a: &[f64], b: &[f64]) -> f64 {
    let min_b = b.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_b = b.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let range = max_b - min_b;
    if range.is_nan() || range <= 0.0 {
        return 0.0;
    }
    rmse(a, b) / range
}

/// ||a - b||₂ / ||b||₂
pub fn relative_error(a: &[f64], b: &[f64]) -> f64 {
    let num: f64 = a.iter().zip(b.iter()).map(|(&x, &y)| (x - y) * (x - y)).sum();
    let den: f64 = b.iter().map(|&y| y * y).sum();
    if den == 0.0 {
        return num.sqrt();
    }
    (num / den).sqrt()
}

/// Pearson correlation coefficient
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let (mut sum_a, mut sum_b, mut sum_ab, mut sum_a2, mut sum_b2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b.iter()) {
        sum_a += x;
        sum_b += y;
        sum_ab += x * y;
        sum_a2 += x * x;
        sum_b2 += y * y;
    }

    let n = n as f64;
    let numerator = n * sum_ab - sum_a * sum_b;
    let denominator = ((n * sum_a2 - sum_a * sum_a) * (n * sum_b2 - sum_b * sum_b)).sqrt();

    if denominator == 0.0 {
        return 0.0;
    }

    numerator / denominator
}
