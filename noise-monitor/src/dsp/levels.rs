//! Per-block average and peak level.
//!
//! Two ways to measure a block, chosen once at construction:
//!
//! - [`LevelStrategy::Spectrum`]: mean and max of the magnitude half-spectrum.
//! - [`LevelStrategy::Samples`]: mean and max of the absolute sample values.
//!
//! The peak returned here is the block's own maximum. Holding the peak across
//! a reporting window is done by the [`Aggregator`](crate::aggregate::Aggregator).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::spectrum::SpectralFrame;

/// Linear loudness of one block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelSample {
    pub average: f32,
    pub peak: f32,
}

/// Which domain levels are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LevelStrategy {
    /// Magnitude spectrum bins.
    #[default]
    Spectrum,
    /// Absolute time-domain samples.
    Samples,
}

/// Level extractor with a fixed strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelExtractor {
    strategy: LevelStrategy,
}

impl LevelExtractor {
    pub const fn new(strategy: LevelStrategy) -> Self {
        LevelExtractor { strategy }
    }

    pub fn strategy(&self) -> LevelStrategy {
        self.strategy
    }

    /// Measure one block given its samples and its spectrum.
    pub fn extract(&self, samples: &[i32], frame: &SpectralFrame<'_>) -> LevelSample {
        match self.strategy {
            LevelStrategy::Spectrum => spectrum_levels(frame.magnitude),
            LevelStrategy::Samples => sample_levels(samples),
        }
    }
}

/// Mean and max over magnitude bins. Zero for an empty slice.
pub fn spectrum_levels(magnitude: &[f32]) -> LevelSample {
    if magnitude.is_empty() {
        return LevelSample::default();
    }
    let mut sum = 0.0f32;
    let mut peak = 0.0f32;
    for &m in magnitude {
        sum += m;
        if m > peak {
            peak = m;
        }
    }
    LevelSample {
        average: sum / magnitude.len() as f32,
        peak,
    }
}

/// Mean and max of `|sample|`. Zero for an empty slice.
pub fn sample_levels(samples: &[i32]) -> LevelSample {
    if samples.is_empty() {
        return LevelSample::default();
    }
    let mut sum = 0u64;
    let mut peak = 0u32;
    for &s in samples {
        let a = s.unsigned_abs();
        sum += a as u64;
        if a > peak {
            peak = a;
        }
    }
    LevelSample {
        average: (sum as f64 / samples.len() as f64) as f32,
        peak: peak as f32,
    }
}
