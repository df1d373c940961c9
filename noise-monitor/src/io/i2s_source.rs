//! Blocking I2S microphone capture over a [`DmaRing`].
//!
//! ## Architecture
//!
//! ```text
//! I2S RX            DMA ring (ISR → task)                 Pipeline
//! ┌────────┐       ┌──────┬──────┬─────┬──────┐        ┌──────────────┐
//! │ 32-bit │─DMA──►│ buf0 │ buf1 │ ... │ bufK │──pop──►│ AudioBlock<N>│
//! │ slots  │       └──────┴──────┴─────┴──────┘  >>k   └──────────────┘
//! └────────┘
//! ```
//!
//! A block of `N` samples is assembled from `N / LEN` consecutive DMA
//! buffers. Each slot is arithmetic-shifted right by the configured discard
//! bits to drop the bits below the microphone's resolution.
//!
//! ## Usage
//!
//! ```ignore
//! static RING: DmaRing<512, 8> = DmaRing::new();
//!
//! // DMA-complete ISR:
//! RING.complete(&DMA_BUFFERS[finished]);
//! // DMA/I2S error ISR:
//! RING.report_fault(status);
//!
//! // Task:
//! let source = I2sSource::new(&RING, delay, &config)?;
//! let mut monitor = NoiseMonitor::<_, 512>::new(source, config)?;
//! ```

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::block::AudioBlock;
use crate::config::MonitorConfig;
use crate::error::{AcquisitionError, ConfigError};
use crate::source::SampleSource;

use super::dma_ring::DmaRing;

/// Capture side of the I2S receive path.
///
/// Borrows the ring the DMA interrupt fills and waits on it with `D`.
pub struct I2sSource<'r, D, const LEN: usize, const COUNT: usize> {
    ring: &'r DmaRing<LEN, COUNT>,
    delay: D,
    discard_bits: u32,
    timeout_us: u32,
    poll_us: u32,
}

impl<'r, D, const LEN: usize, const COUNT: usize> I2sSource<'r, D, LEN, COUNT>
where
    D: DelayNs,
{
    /// Create a source on `ring`, checking the ring geometry against `config`.
    ///
    /// Pending buffers are discarded so the first capture starts on fresh data.
    pub fn new(
        ring: &'r DmaRing<LEN, COUNT>,
        delay: D,
        config: &MonitorConfig,
    ) -> Result<Self, ConfigError> {
        if LEN == 0 || LEN != config.dma_buffer_len || COUNT != config.dma_buffer_count {
            return Err(ConfigError::RingMismatch {
                ring_len: LEN,
                ring_count: COUNT,
                len: config.dma_buffer_len,
                count: config.dma_buffer_count,
            });
        }
        if config.sample_discard_bits >= 32 {
            return Err(ConfigError::DiscardBits(config.sample_discard_bits));
        }
        if config.capture_timeout_us == 0 {
            return Err(ConfigError::CaptureTimeout);
        }

        ring.discard_all();
        ring.take_overruns();

        Ok(I2sSource {
            ring,
            delay,
            discard_bits: config.sample_discard_bits,
            timeout_us: config.capture_timeout_us,
            poll_us: config.capture_poll_us.max(1),
        })
    }

    /// Bits shifted out of each raw slot.
    pub fn discard_bits(&self) -> u32 {
        self.discard_bits
    }

    /// Release the delay provider.
    pub fn free(self) -> D {
        self.delay
    }

    /// Copy the oldest ring buffer into `dst`, shifting every slot.
    fn pop_into(&self, dst: &mut [i32]) -> bool {
        let shift = self.discard_bits;
        self.ring
            .pop_with(|buf| {
                for (d, &raw) in dst.iter_mut().zip(buf.iter()) {
                    *d = raw >> shift;
                }
            })
            .is_some()
    }
}

impl<D, const LEN: usize, const COUNT: usize, const N: usize> SampleSource<N>
    for I2sSource<'_, D, LEN, COUNT>
where
    D: DelayNs,
{
    fn capture(&mut self, block: &mut AudioBlock<N>) -> Result<(), AcquisitionError> {
        assert!(
            LEN > 0 && N % LEN == 0,
            "block of {} samples is not a whole number of {}-slot DMA buffers",
            N,
            LEN
        );

        if let Some(status) = self.ring.take_fault() {
            return Err(AcquisitionError::Peripheral { status });
        }

        // Anything queued behind an overrun is older than the gap; start fresh.
        let stale = self.ring.take_overruns();
        if stale > 0 {
            let flushed = self.ring.discard_all();
            warn!(
                "DMA ring overran by {} buffer(s) between captures, flushed {}",
                stale, flushed
            );
        }

        let mut filled = 0;
        let mut waited_us: u32 = 0;
        while filled < N {
            if let Some(status) = self.ring.take_fault() {
                return Err(AcquisitionError::Peripheral { status });
            }

            if self.pop_into(&mut block[filled..filled + LEN]) {
                filled += LEN;
                continue;
            }

            if waited_us >= self.timeout_us {
                return Err(AcquisitionError::Timeout { waited_us });
            }
            self.delay.delay_us(self.poll_us);
            waited_us = waited_us.saturating_add(self.poll_us);
        }

        let dropped = self.ring.take_overruns();
        if dropped > 0 {
            // Buffers still queued are from before the gap; the next block
            // must not start with them.
            let flushed = self.ring.discard_all();
            warn!(
                "DMA ring overran by {} buffer(s) mid-block, flushed {}",
                dropped, flushed
            );
            return Err(AcquisitionError::Overrun { dropped });
        }
        Ok(())
    }
}
