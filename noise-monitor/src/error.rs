//! Error types.
//!
//! Acquisition errors are per-block and recoverable: the pipeline skips the
//! block and captures again. Configuration errors are integration bugs and
//! are returned from constructors so they surface at startup.

use thiserror::Error;

/// Failure to capture one audio block from the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// No complete block arrived within the capture timeout.
    #[error("no audio block within {waited_us} us")]
    Timeout { waited_us: u32 },

    /// The DMA or I2S driver flagged an error.
    #[error("audio peripheral fault (driver status {status})")]
    Peripheral { status: i32 },

    /// DMA buffers were dropped while a block was being assembled.
    #[error("DMA overrun, {dropped} buffer(s) lost mid-block")]
    Overrun { dropped: u32 },
}

/// Invalid construction-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("block length {0} is not a power of two >= 2")]
    BlockLength(usize),

    #[error("sample rate must be non-zero")]
    SampleRate,

    #[error("block of {block} samples cannot be built from {count} DMA buffers of {len} slots")]
    DmaGeometry { block: usize, len: usize, count: usize },

    #[error("DMA ring of {ring_count} x {ring_len} slots does not match configured {count} x {len}")]
    RingMismatch {
        ring_len: usize,
        ring_count: usize,
        len: usize,
        count: usize,
    },

    #[error("cannot discard {0} bits of a 32-bit sample")]
    DiscardBits(u32),

    #[error("report period of {period_ms} ms is shorter than one {block}-sample block")]
    ReportPeriod { period_ms: u32, block: usize },

    #[error("calibration offset {0} dB is not finite")]
    Calibration(f32),

    #[error("capture timeout must be non-zero")]
    CaptureTimeout,

    #[error("unavailable threshold must be at least one failure")]
    UnavailableThreshold,
}

/// Error from one pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Captures have failed too many times in a row.
    #[error("audio device unavailable after {failures} consecutive failures (last: {last})")]
    DeviceUnavailable { failures: u32, last: AcquisitionError },
}
