//! The acquisition and analysis pipeline.
//!
//! [`NoiseMonitor`] owns every buffer and piece of state the core needs: the
//! capture block, the FFT working arrays, the A-weighting registers, the
//! weighted spectrum and the reporting window. One call to
//! [`step()`](NoiseMonitor::step) processes exactly one block:
//!
//! ```text
//! capture ─► window + FFT ─► magnitudes ─┬─► levels ─► aggregator ─► report
//!                                        └─► A-weighting ─► weighted spectrum
//! ```
//!
//! Blocks are processed strictly in capture order. A failed capture skips the
//! block without touching the reporting window.
//!
//! ## Usage
//!
//! ```ignore
//! let mut monitor = NoiseMonitor::<_, 512>::new(source, MonitorConfig::default())?;
//! let mut divider = RefreshDivider::default();
//! loop {
//!     if let Cycle::Measured(_) = monitor.poll(&mut uploader)? {
//!         if divider.tick() {
//!             oled.draw_spectrum(monitor.weighted_spectrum());
//!         }
//!     }
//! }
//! ```

use log::{error, info, warn};

use crate::aggregate::{Aggregator, Calibration, DecibelReport, MeasurementWindow, WindowState};
use crate::block::AudioBlock;
use crate::config::MonitorConfig;
use crate::constants::AUDIO_BLOCK_SAMPLES;
use crate::dsp::{AWeighting, LevelExtractor, LevelSample, SpectralEngine};
use crate::error::{AcquisitionError, ConfigError, MonitorError};
use crate::report::ReportSink;
use crate::source::SampleSource;

/// Result of one successfully processed block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockOutcome {
    /// Linear levels of this block.
    pub level: LevelSample,
    /// Present when this block completed a reporting window.
    pub report: Option<DecibelReport>,
}

/// What one [`poll()`](NoiseMonitor::poll) did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cycle {
    /// A block was processed (and any report delivered).
    Measured(BlockOutcome),
    /// The capture failed; the block was skipped.
    Skipped(AcquisitionError),
    /// The capture failed again past the threshold; the sink was told.
    Unavailable { failures: u32 },
}

/// Noise monitor over a [`SampleSource`] delivering blocks of `N` samples.
pub struct NoiseMonitor<S, const N: usize = AUDIO_BLOCK_SAMPLES> {
    source: S,
    block: AudioBlock<N>,
    engine: SpectralEngine<N>,
    weighting: AWeighting,
    /// A-weighted magnitudes; only the first `N / 2` entries are used.
    weighted: [f32; N],
    extractor: LevelExtractor,
    aggregator: Aggregator,
    config: MonitorConfig,
    consecutive_failures: u32,
    blocks_processed: u64,
}

impl<S, const N: usize> NoiseMonitor<S, N>
where
    S: SampleSource<N>,
{
    /// Build a pipeline, validating `config` for blocks of `N` samples.
    pub fn new(source: S, config: MonitorConfig) -> Result<Self, ConfigError> {
        config.validate(N)?;
        let target_blocks = config.blocks_per_window(N);
        info!(
            "noise monitor: {} samples/block at {} Hz, {} blocks per {} ms window, {:?} levels",
            N, config.sample_rate, target_blocks, config.report_period_ms, config.level_strategy
        );

        Ok(NoiseMonitor {
            source,
            block: AudioBlock::zeroed(),
            engine: SpectralEngine::new(),
            weighting: AWeighting::new(config.weighting),
            weighted: [0.0; N],
            extractor: LevelExtractor::new(config.level_strategy),
            aggregator: Aggregator::new(
                target_blocks,
                Calibration {
                    average_db: config.average_calibration_db,
                    peak_db: config.peak_calibration_db,
                },
                config.peak_reset,
            ),
            config,
            consecutive_failures: 0,
            blocks_processed: 0,
        })
    }

    /// Capture and process one block.
    ///
    /// Fails with [`MonitorError::Acquisition`] when the capture fails, or with
    /// [`MonitorError::DeviceUnavailable`] once `unavailable_after` captures in
    /// a row have failed (and for every further failure until one succeeds).
    /// Either way the reporting window is left as it was.
    pub fn step(&mut self) -> Result<BlockOutcome, MonitorError> {
        if let Err(e) = self.source.capture(&mut self.block) {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            let failures = self.consecutive_failures;
            if failures >= self.config.unavailable_after {
                error!("audio device unavailable: {} failed captures, last: {}", failures, e);
                return Err(MonitorError::DeviceUnavailable { failures, last: e });
            }
            warn!("capture failed ({}), block skipped", e);
            return Err(MonitorError::Acquisition(e));
        }
        self.consecutive_failures = 0;
        self.blocks_processed += 1;

        let frame = self.engine.transform(&self.block);
        let level = self.extractor.extract(&self.block[..], &frame);
        self.weighting.apply(frame.magnitude, &mut self.weighted[..N / 2]);
        let report = self.aggregator.push(level);

        Ok(BlockOutcome { level, report })
    }

    /// Run one [`step()`](Self::step) and forward its outcome to `sink`.
    ///
    /// Acquisition errors are absorbed into [`Cycle::Skipped`]; only sink
    /// errors are returned.
    pub fn poll<R>(&mut self, sink: &mut R) -> Result<Cycle, R::Error>
    where
        R: ReportSink,
    {
        match self.step() {
            Ok(outcome) => {
                if let Some(report) = &outcome.report {
                    sink.report(report)?;
                }
                Ok(Cycle::Measured(outcome))
            }
            Err(MonitorError::Acquisition(e)) => Ok(Cycle::Skipped(e)),
            Err(MonitorError::DeviceUnavailable { failures, .. }) => {
                sink.device_unavailable(failures)?;
                Ok(Cycle::Unavailable { failures })
            }
        }
    }
}

impl<S, const N: usize> NoiseMonitor<S, N> {
    /// Magnitude half-spectrum of the last successfully processed block.
    pub fn spectrum(&self) -> &[f32] {
        self.engine.magnitude()
    }

    /// A-weighted magnitude half-spectrum of the last successfully processed block.
    pub fn weighted_spectrum(&self) -> &[f32] {
        &self.weighted[..N / 2]
    }

    /// The capture buffer.
    ///
    /// Holds the samples behind [`spectrum()`](Self::spectrum) only while the
    /// last [`step()`](Self::step) succeeded. After a failed capture its
    /// contents are unspecified; the spectrum still describes the last
    /// processed block.
    pub fn block(&self) -> &AudioBlock<N> {
        &self.block
    }

    /// The reporting window in progress (or just completed).
    pub fn window(&self) -> &MeasurementWindow {
        self.aggregator.window()
    }

    pub fn window_state(&self) -> WindowState {
        self.aggregator.state()
    }

    /// Drop the partial reporting window and start a new one.
    pub fn restart_window(&mut self) {
        self.aggregator.reset();
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Failed captures since the last successful one.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Blocks successfully processed since construction.
    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Release the sample source.
    pub fn free(self) -> S {
        self.source
    }
}
