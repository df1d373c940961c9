//! # noise-monitor
//!
//! A `no_std`, allocation-free core for a continuous environmental noise
//! monitor on a microcontroller with a DMA-fed I2S microphone. It captures
//! fixed-size sample blocks, computes a Hamming-windowed FFT magnitude
//! spectrum, measures per-block average and peak levels, applies an
//! A-weighting filter, and aggregates levels into a decibel report once per
//! reporting window.
//!
//! Networking, display drawing and the top-level scheduling loop are left to
//! the application, which plugs in through [`source::SampleSource`] and
//! [`report::ReportSink`].
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`block`] | Fixed-size sample block |
//! | Trait | [`source`] / [`report`] | `SampleSource` and `ReportSink` seams |
//! | I/O | [`io`] | DMA receive ring and blocking I2S source |
//! | DSP | [`dsp`] | Window, FFT, levels, A-weighting |
//! | Aggregation | [`aggregate`] | Reporting-window state machine, dB conversion |
//! | Pipeline | [`pipeline`] | [`NoiseMonitor`](pipeline::NoiseMonitor): one block per step |
//! | Display | [`display`] | Spectrum bar scaling and refresh divider |
//!
//! ## Quick start
//!
//! ```ignore
//! use noise_monitor::config::MonitorConfig;
//! use noise_monitor::io::{DmaRing, I2sSource};
//! use noise_monitor::pipeline::NoiseMonitor;
//!
//! static RING: DmaRing<512, 8> = DmaRing::new();
//!
//! // DMA-complete ISR:
//! RING.complete(&dma_buffers[finished]);
//!
//! // Task:
//! let config = MonitorConfig::default();
//! let source = I2sSource::new(&RING, delay, &config)?;
//! let mut monitor = NoiseMonitor::<_, 512>::new(source, config)?;
//! loop {
//!     monitor.poll(&mut uploader)?;
//! }
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `dma` | yes | [`io::I2sSource`] (requires `embedded-hal`) |
//! | `serde` | no | `Serialize`/`Deserialize` on config and measurement types |
//!
//! ## Audio parameters
//!
//! - **Block size:** 512 samples ([`constants::AUDIO_BLOCK_SAMPLES`])
//! - **Sample rate:** 44 100 Hz ([`constants::AUDIO_SAMPLE_RATE`])
//! - **Sample format:** 32-bit I2S slot, shifted right by 8 (24-bit microphone)
//! - **DMA:** 8 buffers × 512 slots ([`constants::DMA_BUFFER_COUNT`])
//! - **Reporting window:** 10 s, 861 blocks ([`constants::REPORT_PERIOD_MS`])

#![no_std]

pub mod constants;
pub mod config;
pub mod error;
pub mod block;
pub mod source;
pub mod report;
pub mod io;
pub mod dsp;
pub mod aggregate;
pub mod pipeline;
pub mod display;

pub use aggregate::DecibelReport;
pub use config::MonitorConfig;
pub use error::{AcquisitionError, ConfigError, MonitorError};
pub use pipeline::{Cycle, NoiseMonitor};

#[cfg(all(test, feature = "dma"))]
mod integration_tests;
