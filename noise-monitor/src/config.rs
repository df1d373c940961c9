//! Construction-time pipeline configuration.
//!
//! [`MonitorConfig::default()`] reproduces the values in [`crate::constants`].
//! Nothing here is mutable once a [`NoiseMonitor`](crate::pipeline::NoiseMonitor)
//! has been built from it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::aggregate::PeakReset;
use crate::constants::*;
use crate::dsp::levels::LevelStrategy;
use crate::dsp::weighting::WeightingMode;
use crate::error::ConfigError;

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Slots per DMA buffer.
    pub dma_buffer_len: usize,
    /// DMA buffers in the receive ring.
    pub dma_buffer_count: usize,
    /// Reporting window length in milliseconds.
    pub report_period_ms: u32,
    /// Subtracted from the average level in dB.
    pub average_calibration_db: f32,
    /// Subtracted from the peak level in dB.
    pub peak_calibration_db: f32,
    /// Sub-resolution bits shifted out of each raw sample.
    pub sample_discard_bits: u32,
    /// Maximum wait for one block.
    pub capture_timeout_us: u32,
    /// Sleep between polls of an empty DMA ring.
    pub capture_poll_us: u32,
    /// Consecutive failures before the device is reported unavailable.
    pub unavailable_after: u32,
    /// Whether block levels come from the spectrum or the samples.
    pub level_strategy: LevelStrategy,
    /// Whether the reported peak is held for the window or taken per block.
    pub peak_reset: PeakReset,
    /// Whether the A-weighting registers survive between blocks.
    pub weighting: WeightingMode,
}

impl MonitorConfig {
    /// Configuration matching the compile-time constants.
    pub const fn new() -> Self {
        MonitorConfig {
            sample_rate: AUDIO_SAMPLE_RATE,
            dma_buffer_len: DMA_BUFFER_LEN,
            dma_buffer_count: DMA_BUFFER_COUNT,
            report_period_ms: REPORT_PERIOD_MS,
            average_calibration_db: AVERAGE_CALIBRATION_DB,
            peak_calibration_db: PEAK_CALIBRATION_DB,
            sample_discard_bits: SAMPLE_DISCARD_BITS,
            capture_timeout_us: CAPTURE_TIMEOUT_US,
            capture_poll_us: CAPTURE_POLL_US,
            unavailable_after: UNAVAILABLE_AFTER_FAILURES,
            level_strategy: LevelStrategy::Spectrum,
            peak_reset: PeakReset::PerWindow,
            weighting: WeightingMode::ResetPerCall,
        }
    }

    /// Check the configuration against a block length of `block_len` samples.
    pub fn validate(&self, block_len: usize) -> Result<(), ConfigError> {
        if block_len < 2 || !block_len.is_power_of_two() {
            return Err(ConfigError::BlockLength(block_len));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if self.dma_buffer_len == 0
            || self.dma_buffer_count < 2
            || block_len % self.dma_buffer_len != 0
        {
            return Err(ConfigError::DmaGeometry {
                block: block_len,
                len: self.dma_buffer_len,
                count: self.dma_buffer_count,
            });
        }
        if self.sample_discard_bits >= 32 {
            return Err(ConfigError::DiscardBits(self.sample_discard_bits));
        }
        for offset in [self.average_calibration_db, self.peak_calibration_db] {
            if !offset.is_finite() {
                return Err(ConfigError::Calibration(offset));
            }
        }
        if self.capture_timeout_us == 0 {
            return Err(ConfigError::CaptureTimeout);
        }
        if self.unavailable_after == 0 {
            return Err(ConfigError::UnavailableThreshold);
        }
        if self.blocks_per_window(block_len) == 0 {
            return Err(ConfigError::ReportPeriod {
                period_ms: self.report_period_ms,
                block: block_len,
            });
        }
        Ok(())
    }

    /// Whole blocks of `block_len` samples covering one reporting window.
    ///
    /// `report_period / (block_len / sample_rate)`, rounded down.
    pub fn blocks_per_window(&self, block_len: usize) -> u32 {
        if block_len == 0 {
            return 0;
        }
        let samples = self.report_period_ms as u64 * self.sample_rate as u64;
        let blocks = samples / (block_len as u64 * 1000);
        blocks.min(u32::MAX as u64) as u32
    }

    /// Duration of one block in microseconds, rounded down.
    pub fn block_duration_us(&self, block_len: usize) -> u32 {
        if self.sample_rate == 0 {
            return 0;
        }
        (block_len as u64 * 1_000_000 / self.sample_rate as u64) as u32
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.validate(AUDIO_BLOCK_SAMPLES), Ok(()));
    }

    #[test]
    fn ten_second_window_at_44k1() {
        let cfg = MonitorConfig::default();
        // 10 s / (512 / 44100 s) = 861.3
        assert_eq!(cfg.blocks_per_window(512), 861);
        assert_eq!(cfg.block_duration_us(512), 11_609);
    }

    #[test]
    fn rejects_non_power_of_two_block() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.validate(500), Err(ConfigError::BlockLength(500)));
        assert_eq!(cfg.validate(1), Err(ConfigError::BlockLength(1)));
    }

    #[test]
    fn rejects_block_not_made_of_dma_buffers() {
        let cfg = MonitorConfig {
            dma_buffer_len: 384,
            ..MonitorConfig::default()
        };
        assert!(matches!(
            cfg.validate(512),
            Err(ConfigError::DmaGeometry { block: 512, len: 384, .. })
        ));

        let cfg = MonitorConfig {
            dma_buffer_count: 1,
            ..MonitorConfig::default()
        };
        assert!(matches!(cfg.validate(512), Err(ConfigError::DmaGeometry { .. })));
    }

    #[test]
    fn block_may_span_several_dma_buffers() {
        let cfg = MonitorConfig {
            dma_buffer_len: 128,
            ..MonitorConfig::default()
        };
        assert_eq!(cfg.validate(512), Ok(()));
    }

    #[test]
    fn rejects_window_shorter_than_a_block() {
        let cfg = MonitorConfig {
            report_period_ms: 5,
            ..MonitorConfig::default()
        };
        assert_eq!(
            cfg.validate(512),
            Err(ConfigError::ReportPeriod { period_ms: 5, block: 512 })
        );
    }

    #[test]
    fn rejects_bad_scalars() {
        let base = MonitorConfig::default();

        let cfg = MonitorConfig { sample_rate: 0, ..base };
        assert_eq!(cfg.validate(512), Err(ConfigError::SampleRate));

        let cfg = MonitorConfig { sample_discard_bits: 32, ..base };
        assert_eq!(cfg.validate(512), Err(ConfigError::DiscardBits(32)));

        let cfg = MonitorConfig { peak_calibration_db: f32::INFINITY, ..base };
        assert_eq!(cfg.validate(512), Err(ConfigError::Calibration(f32::INFINITY)));

        let cfg = MonitorConfig { capture_timeout_us: 0, ..base };
        assert_eq!(cfg.validate(512), Err(ConfigError::CaptureTimeout));

        let cfg = MonitorConfig { unavailable_after: 0, ..base };
        assert_eq!(cfg.validate(512), Err(ConfigError::UnavailableThreshold));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_fills_defaults() {
        let cfg: MonitorConfig =
            serde_json::from_str(r#"{ "report_period_ms": 1000, "peak_reset": "PerBlock" }"#)
                .unwrap();
        assert_eq!(cfg.report_period_ms, 1000);
        assert_eq!(cfg.peak_reset, PeakReset::PerBlock);
        assert_eq!(cfg.sample_rate, AUDIO_SAMPLE_RATE);
    }
}
