//! Reporting-window aggregation.
//!
//! The [`Aggregator`] folds per-block [`LevelSample`]s into a running mean and
//! a running peak. After `target_blocks` blocks it converts both to decibels
//! and hands back a [`DecibelReport`]; the next block opens a fresh window.
//!
//! ```text
//!            push (blocks < target)
//!           ┌──────────┐
//!           ▼          │
//!   ┌──────────────┐───┘  blocks == target  ┌────────────────┐
//!   │ Accumulating │ ───────────────────────►│ WindowComplete │
//!   └──────────────┘◄─────── next push ──────└────────────────┘
//! ```

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::levels::LevelSample;

/// Smallest linear level fed to the logarithm.
pub const LEVEL_FLOOR: f32 = f32::MIN_POSITIVE;

/// When the running peak starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PeakReset {
    /// Hold the highest peak for the whole window.
    #[default]
    PerWindow,
    /// Report only the last block's peak.
    PerBlock,
}

/// Aggregator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Accumulating,
    WindowComplete,
}

/// Offsets subtracted after the dB conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub average_db: f32,
    pub peak_db: f32,
}

/// Running values of the current window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementWindow {
    /// Mean of the per-block averages so far.
    pub average: f32,
    /// Highest peak so far (or the last block's, with [`PeakReset::PerBlock`]).
    pub peak: f32,
    /// Blocks folded in so far.
    pub blocks: u32,
    /// Blocks that complete the window.
    pub target_blocks: u32,
}

/// Decibel levels for one completed window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecibelReport {
    pub average_db: f32,
    pub peak_db: f32,
    /// Blocks the window covered.
    pub blocks: u32,
}

/// Periodic-window state machine.
pub struct Aggregator {
    window: MeasurementWindow,
    state: WindowState,
    calibration: Calibration,
    peak_reset: PeakReset,
}

impl Aggregator {
    /// Create an aggregator completing a window every `target_blocks` blocks.
    ///
    /// # Panics
    ///
    /// If `target_blocks` is zero.
    pub fn new(target_blocks: u32, calibration: Calibration, peak_reset: PeakReset) -> Self {
        assert!(target_blocks > 0, "reporting window must span at least one block");
        Aggregator {
            window: MeasurementWindow {
                average: 0.0,
                peak: 0.0,
                blocks: 0,
                target_blocks,
            },
            state: WindowState::Accumulating,
            calibration,
            peak_reset,
        }
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    /// The window being accumulated, or the one just completed.
    pub fn window(&self) -> &MeasurementWindow {
        &self.window
    }

    /// Abandon the current window and start a new one.
    pub fn reset(&mut self) {
        self.window.average = 0.0;
        self.window.peak = 0.0;
        self.window.blocks = 0;
        self.state = WindowState::Accumulating;
    }

    /// Fold in one block. Returns the report when this block completes the window.
    pub fn push(&mut self, level: LevelSample) -> Option<DecibelReport> {
        if self.state == WindowState::WindowComplete {
            self.reset();
        }

        let w = &mut self.window;
        let n = w.blocks as f32;
        w.average = (w.average * n + level.average) / (n + 1.0);
        w.peak = match self.peak_reset {
            PeakReset::PerWindow => w.peak.max(level.peak),
            PeakReset::PerBlock => level.peak,
        };
        w.blocks += 1;

        if w.blocks < w.target_blocks {
            return None;
        }

        self.state = WindowState::WindowComplete;
        let report = DecibelReport {
            average_db: to_decibels(w.average, self.calibration.average_db),
            peak_db: to_decibels(w.peak, self.calibration.peak_db),
            blocks: w.blocks,
        };
        debug!(
            "window complete after {} blocks: avg {} dB, peak {} dB",
            report.blocks, report.average_db, report.peak_db
        );
        Some(report)
    }
}

/// `20 * log10(linear) - offset_db`, always finite.
///
/// Levels below [`LEVEL_FLOOR`] (including zero and NaN) are raised to it;
/// infinite levels are capped at `f32::MAX`.
pub fn to_decibels(linear: f32, offset_db: f32) -> f32 {
    let clamped = if linear.is_nan() || linear < LEVEL_FLOOR {
        debug!("level {} clamped to floor before dB conversion", linear);
        LEVEL_FLOOR
    } else {
        linear.min(f32::MAX)
    };
    20.0 * libm::log10f(clamped) - offset_db
}
