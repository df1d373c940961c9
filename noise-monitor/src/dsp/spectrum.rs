//! Windowed FFT magnitude spectrum of one audio block.

use crate::block::AudioBlock;
use crate::constants::AUDIO_BLOCK_SAMPLES;

use super::{fft, window};

/// Owns the FFT working buffers for blocks of `N` samples.
///
/// Every [`transform()`](Self::transform) overwrites all buffers; no state
/// carries from one block to the next.
///
/// # Example
/// ```ignore
/// let mut engine = SpectralEngine::<512>::new();
/// let frame = engine.transform(&block);
/// let loudest = frame.dominant_bin();
/// ```
pub struct SpectralEngine<const N: usize = AUDIO_BLOCK_SAMPLES> {
    window: [f32; N],
    real: [f32; N],
    imag: [f32; N],
    /// Only the first `N / 2` entries are meaningful.
    magnitude: [f32; N],
}

/// Borrowed result of one transform.
#[derive(Debug, Clone, Copy)]
pub struct SpectralFrame<'a> {
    /// Real part of the full `N`-bin transform.
    pub real: &'a [f32],
    /// Imaginary part of the full `N`-bin transform.
    pub imag: &'a [f32],
    /// `N / 2` non-negative bin magnitudes (DC to just below Nyquist).
    pub magnitude: &'a [f32],
}

impl<const N: usize> SpectralEngine<N> {
    /// Create an engine with a precomputed Hamming window.
    ///
    /// # Panics
    ///
    /// If `N` is not a power of two of at least 2.
    pub fn new() -> Self {
        assert!(
            N >= 2 && N.is_power_of_two(),
            "spectral block length {} is not a power of two >= 2",
            N
        );
        SpectralEngine {
            window: window::hamming::<N>(),
            real: [0.0; N],
            imag: [0.0; N],
            magnitude: [0.0; N],
        }
    }

    /// Window, transform and take magnitudes of `block`.
    pub fn transform(&mut self, block: &AudioBlock<N>) -> SpectralFrame<'_> {
        for (r, &s) in self.real.iter_mut().zip(block.iter()) {
            *r = s as f32;
        }
        self.imag.fill(0.0);

        window::apply(&mut self.real, &self.window);
        fft::forward(&mut self.real, &mut self.imag);
        fft::magnitudes(&self.real, &self.imag, &mut self.magnitude[..N / 2]);

        self.frame()
    }

    /// The most recent transform result.
    pub fn frame(&self) -> SpectralFrame<'_> {
        SpectralFrame {
            real: &self.real,
            imag: &self.imag,
            magnitude: &self.magnitude[..N / 2],
        }
    }

    /// Magnitude half-spectrum of the most recent transform.
    pub fn magnitude(&self) -> &[f32] {
        &self.magnitude[..N / 2]
    }
}

impl<const N: usize> Default for SpectralEngine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectralFrame<'_> {
    /// Bin with the largest magnitude, ignoring DC. `None` if all are zero.
    pub fn dominant_bin(&self) -> Option<usize> {
        let mut best = None;
        let mut best_mag = 0.0f32;
        for (k, &m) in self.magnitude.iter().enumerate().skip(1) {
            if m > best_mag {
                best_mag = m;
                best = Some(k);
            }
        }
        best
    }

    /// Centre frequency in Hz of `bin` for this frame at `sample_rate`.
    pub fn bin_frequency(&self, bin: usize, sample_rate: u32) -> f32 {
        bin_frequency(bin, self.real.len(), sample_rate)
    }
}

/// Centre frequency in Hz of `bin` in a `block_len`-point transform.
pub fn bin_frequency(bin: usize, block_len: usize, sample_rate: u32) -> f32 {
    bin as f32 * sample_rate as f32 / block_len as f32
}
