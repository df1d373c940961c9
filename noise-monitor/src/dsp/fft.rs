//! In-place radix-2 decimation-in-time FFT.
//!
//! Operates on separate real and imaginary arrays so the spectral engine can
//! keep its working buffers as plain `[f32; N]`. Twiddle factors are computed
//! once per butterfly index with `libm::sincosf`, `N - 1` evaluations per
//! transform, which keeps the code table-free.

use core::f32::consts::PI;

/// Forward FFT of `(re, im)` in place. No normalisation.
///
/// # Panics
///
/// If the slices differ in length or the length is not a power of two.
pub fn forward(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    assert_eq!(n, im.len(), "real/imaginary length mismatch");
    assert!(n.is_power_of_two(), "FFT length {} is not a power of two", n);
    if n < 2 {
        return;
    }

    bit_reverse_permute(re, im);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = -2.0 * PI / len as f32;
        for j in 0..half {
            let (s, c) = libm::sincosf(step * j as f32);
            let mut start = 0;
            while start < n {
                let a = start + j;
                let b = a + half;
                let tr = re[b] * c - im[b] * s;
                let ti = re[b] * s + im[b] * c;
                re[b] = re[a] - tr;
                im[b] = im[a] - ti;
                re[a] += tr;
                im[a] += ti;
                start += len;
            }
        }
        len <<= 1;
    }
}

/// `sqrt(re² + im²)` for the first `out.len()` bins.
pub fn magnitudes(re: &[f32], im: &[f32], out: &mut [f32]) {
    assert!(out.len() <= re.len() && out.len() <= im.len());
    for ((m, &r), &i) in out.iter_mut().zip(re.iter()).zip(im.iter()) {
        *m = libm::sqrtf(r * r + i * i);
    }
}

fn bit_reverse_permute(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if j > i {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// O(n²) reference transform.
    fn naive_dft<const N: usize>(input: &[f32; N]) -> ([f32; N], [f32; N]) {
        let mut re = [0.0f32; N];
        let mut im = [0.0f32; N];
        for k in 0..N {
            let mut sr = 0.0f64;
            let mut si = 0.0f64;
            for (t, &x) in input.iter().enumerate() {
                let angle = -2.0 * core::f64::consts::PI * (k * t) as f64 / N as f64;
                sr += x as f64 * libm::cos(angle);
                si += x as f64 * libm::sin(angle);
            }
            re[k] = sr as f32;
            im[k] = si as f32;
        }
        (re, im)
    }

    #[test]
    fn impulse_is_flat() {
        let mut re = [0.0f32; 16];
        let mut im = [0.0f32; 16];
        re[0] = 1.0;
        forward(&mut re, &mut im);
        for k in 0..16 {
            assert!((re[k] - 1.0).abs() < 1e-6, "re[{k}] = {}", re[k]);
            assert!(im[k].abs() < 1e-6, "im[{k}] = {}", im[k]);
        }
    }

    #[test]
    fn dc_lands_in_bin_zero() {
        let mut re = [3.0f32; 64];
        let mut im = [0.0f32; 64];
        forward(&mut re, &mut im);
        assert!((re[0] - 192.0).abs() < 1e-3);
        for k in 1..64 {
            assert!(re[k].abs() < 1e-3 && im[k].abs() < 1e-3, "leak at bin {k}");
        }
    }

    #[test]
    fn matches_naive_dft() {
        let input: [f32; 32] =
            core::array::from_fn(|i| ((i * 7 + 3) % 11) as f32 - 5.0 + 0.25 * i as f32);
        let (want_re, want_im) = naive_dft(&input);

        let mut re = input;
        let mut im = [0.0f32; 32];
        forward(&mut re, &mut im);

        for k in 0..32 {
            assert!((re[k] - want_re[k]).abs() < 1e-3, "re[{k}]: {} vs {}", re[k], want_re[k]);
            assert!((im[k] - want_im[k]).abs() < 1e-3, "im[{k}]: {} vs {}", im[k], want_im[k]);
        }
    }

    #[test]
    fn trivial_lengths() {
        let mut re = [5.0f32];
        let mut im = [0.0f32];
        forward(&mut re, &mut im);
        assert_eq!(re, [5.0]);

        let mut re = [1.0f32, 2.0];
        let mut im = [0.0f32; 2];
        forward(&mut re, &mut im);
        assert_eq!(re, [3.0, -1.0]);
    }

    #[test]
    #[should_panic]
    fn rejects_non_power_of_two() {
        let mut re = [0.0f32; 12];
        let mut im = [0.0f32; 12];
        forward(&mut re, &mut im);
    }

    #[test]
    fn magnitude_of_3_4_is_5() {
        let mut out = [0.0f32; 2];
        magnitudes(&[3.0, -6.0, 1.0], &[4.0, 8.0, 1.0], &mut out);
        assert_eq!(out, [5.0, 10.0]);
    }
}
