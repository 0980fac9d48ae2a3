//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when every value lies within `tolerance` of the first, scaled by magnitude.
pub fn is_constant(values: &[f64], tolerance: f64) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    let scale = first.abs().max(1.0);
    values.iter().all(|v| (v - first).abs() <= tolerance * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn is_constant_scales_with_magnitude() {
        assert!(is_constant(&[5.0, 5.0, 5.0], 1e-12));
        assert!(is_constant(&[1e9, 1e9 + 1e-4], 1e-12));
        assert!(!is_constant(&[1.0, 1.0, 1.001], 1e-12));
        assert!(is_constant(&[], 1e-12));
    }
}
