//! Hamming window.

use core::f32::consts::PI;

/// Hamming window coefficients for an `N`-point frame.
///
/// `w[i] = 0.54 - 0.46 * cos(2πi / (N - 1))`, symmetric, 0.08 at both ends.
pub fn hamming<const N: usize>() -> [f32; N] {
    assert!(N >= 2, "window needs at least 2 points");
    let denom = (N - 1) as f32;
    core::array::from_fn(|i| 0.54 - 0.46 * libm::cosf(2.0 * PI * i as f32 / denom))
}

/// Multiply `data` by `window` sample-by-sample.
pub fn apply(data: &mut [f32], window: &[f32]) {
    assert_eq!(data.len(), window.len(), "window length mismatch");
    for (d, &w) in data.iter_mut().zip(window.iter()) {
        *d *= w;
    }
}
