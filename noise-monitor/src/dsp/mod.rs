//! Signal processing: spectrum, levels and weighting.
//!
//! | Module | Stage |
//! |--------|-------|
//! | [`window`] | Hamming window |
//! | [`fft`] | Radix-2 forward FFT and magnitudes |
//! | [`spectrum`] | [`SpectralEngine`]: block → windowed magnitude spectrum |
//! | [`levels`] | [`LevelExtractor`]: block/spectrum → average and peak |
//! | [`weighting`] | [`AWeighting`]: fixed A-weighting biquad |

pub mod fft;
pub mod levels;
pub mod spectrum;
pub mod weighting;
pub mod window;

pub use levels::{LevelExtractor, LevelSample, LevelStrategy};
pub use spectrum::{SpectralEngine, SpectralFrame};
pub use weighting::{AWeighting, FilterState, WeightingMode};
