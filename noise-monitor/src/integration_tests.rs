//! Integration tests exercising the full capture-to-report path in software.
//!
//! A mock delay plays the DMA interrupt: every time the source waits, it
//! completes another buffer of a synthetic tone into the ring.
//!
//! ```text
//! ToneDma (delay) → DmaRing → I2sSource → NoiseMonitor → RecordingSink
//! ```

#[cfg(test)]
mod tests {
    use core::convert::Infallible;
    use core::f32::consts::PI;

    use embedded_hal::delay::DelayNs;

    use crate::aggregate::{DecibelReport, WindowState};
    use crate::config::MonitorConfig;
    use crate::display::{RefreshDivider, SpectrumView};
    use crate::dsp::spectrum::SpectralFrame;
    use crate::error::AcquisitionError;
    use crate::io::{DmaRing, I2sSource};
    use crate::pipeline::{Cycle, NoiseMonitor};
    use crate::report::ReportSink;

    const LEN: usize = 64;
    const COUNT: usize = 4;
    const RATE: f32 = 44_100.0;

    /// Bin 5 of a 64-point transform at 44.1 kHz.
    const TONE_HZ: f32 = 5.0 * RATE / LEN as f32;

    /// Delay that completes one tone buffer per wait, unless disabled.
    struct ToneDma<'a> {
        ring: &'a DmaRing<LEN, COUNT>,
        amplitude: f32,
        sample: usize,
        enabled: bool,
    }

    impl DelayNs for ToneDma<'_> {
        fn delay_ns(&mut self, _ns: u32) {
            if !self.enabled {
                return;
            }
            let mut buf = [0i32; LEN];
            for slot in buf.iter_mut() {
                let t = self.sample as f32 / RATE;
                let value = (self.amplitude * libm::sinf(2.0 * PI * TONE_HZ * t)) as i32;
                // Microphone data sits in the upper 24 bits of the slot.
                *slot = value << 8;
                self.sample += 1;
            }
            self.ring.complete(&buf);
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        reports: [Option<DecibelReport>; 4],
        count: usize,
        unavailable: u32,
    }

    impl ReportSink for RecordingSink {
        type Error = Infallible;

        fn report(&mut self, report: &DecibelReport) -> Result<(), Infallible> {
            if self.count < self.reports.len() {
                self.reports[self.count] = Some(*report);
            }
            self.count += 1;
            Ok(())
        }

        fn device_unavailable(&mut self, failures: u32) -> Result<(), Infallible> {
            self.unavailable = failures;
            Ok(())
        }
    }

    /// 64-sample blocks from one 64-slot DMA buffer each; 6 blocks per window.
    fn config() -> MonitorConfig {
        MonitorConfig {
            dma_buffer_len: LEN,
            dma_buffer_count: COUNT,
            report_period_ms: 10,
            capture_timeout_us: 1_000,
            capture_poll_us: 100,
            unavailable_after: 2,
            ..MonitorConfig::default()
        }
    }

    fn tone_dma(ring: &DmaRing<LEN, COUNT>, amplitude: f32) -> ToneDma<'_> {
        ToneDma { ring, amplitude, sample: 0, enabled: true }
    }

    // ---------------------------------------------------------------
    // Full path: tone → report
    // ---------------------------------------------------------------
    #[test]
    fn tone_window_produces_report() {
        let ring = DmaRing::new();
        let source = I2sSource::new(&ring, tone_dma(&ring, 100_000.0), &config()).unwrap();
        let mut monitor = NoiseMonitor::<_, LEN>::new(source, config()).unwrap();
        let mut sink = RecordingSink::default();

        for _ in 0..6 {
            assert!(matches!(monitor.poll(&mut sink), Ok(Cycle::Measured(_))));
        }

        assert_eq!(sink.count, 1);
        assert_eq!(monitor.window_state(), WindowState::WindowComplete);
        let report = sink.reports[0].unwrap();
        assert_eq!(report.blocks, 6);
        assert!(report.peak_db > report.average_db);
        assert!(report.average_db.is_finite());

        // The low bits were discarded before analysis.
        assert!(monitor.block().iter().all(|s| s.unsigned_abs() <= 100_000));

        let frame = SpectralFrame {
            real: &[0.0; LEN],
            imag: &[0.0; LEN],
            magnitude: monitor.spectrum(),
        };
        assert_eq!(frame.dominant_bin(), Some(5));
        assert_eq!(monitor.weighted_spectrum().len(), LEN / 2);
    }

    #[test]
    fn louder_tone_reports_higher_level() {
        let quiet_ring = DmaRing::new();
        let loud_ring = DmaRing::new();
        let mut quiet = NoiseMonitor::<_, LEN>::new(
            I2sSource::new(&quiet_ring, tone_dma(&quiet_ring, 1_000.0), &config()).unwrap(),
            config(),
        )
        .unwrap();
        let mut loud = NoiseMonitor::<_, LEN>::new(
            I2sSource::new(&loud_ring, tone_dma(&loud_ring, 100_000.0), &config()).unwrap(),
            config(),
        )
        .unwrap();

        let mut quiet_sink = RecordingSink::default();
        let mut loud_sink = RecordingSink::default();
        for _ in 0..6 {
            quiet.poll(&mut quiet_sink).unwrap();
            loud.poll(&mut loud_sink).unwrap();
        }

        let q = quiet_sink.reports[0].unwrap();
        let l = loud_sink.reports[0].unwrap();
        // 100x amplitude is +40 dB.
        assert!((l.average_db - q.average_db - 40.0).abs() < 1.0);
        assert!((l.peak_db - q.peak_db - 40.0).abs() < 1.0);
    }

    // ---------------------------------------------------------------
    // Failures do not corrupt the window
    // ---------------------------------------------------------------
    #[test]
    fn peripheral_fault_skips_one_block() {
        let ring = DmaRing::new();
        let source = I2sSource::new(&ring, tone_dma(&ring, 50_000.0), &config()).unwrap();
        let mut monitor = NoiseMonitor::<_, LEN>::new(source, config()).unwrap();
        let mut sink = RecordingSink::default();

        monitor.poll(&mut sink).unwrap();
        monitor.poll(&mut sink).unwrap();
        let before = *monitor.window();

        ring.report_fault(-1);
        assert_eq!(
            monitor.poll(&mut sink),
            Ok(Cycle::Skipped(AcquisitionError::Peripheral { status: -1 }))
        );
        assert_eq!(*monitor.window(), before);

        for _ in 0..4 {
            monitor.poll(&mut sink).unwrap();
        }
        assert_eq!(sink.count, 1);
        assert_eq!(sink.reports[0].unwrap().blocks, 6);
        assert_eq!(monitor.blocks_processed(), 6);
    }

    #[test]
    fn silent_dma_reports_unavailable() {
        let ring = DmaRing::new();
        let mut dma = tone_dma(&ring, 1.0);
        dma.enabled = false;
        let source = I2sSource::new(&ring, dma, &config()).unwrap();
        let mut monitor = NoiseMonitor::<_, LEN>::new(source, config()).unwrap();
        let mut sink = RecordingSink::default();

        assert_eq!(
            monitor.poll(&mut sink),
            Ok(Cycle::Skipped(AcquisitionError::Timeout { waited_us: 1_000 }))
        );
        assert_eq!(monitor.poll(&mut sink), Ok(Cycle::Unavailable { failures: 2 }));
        assert_eq!(sink.unavailable, 2);
        assert_eq!(sink.count, 0);
        assert_eq!(monitor.window().blocks, 0);
        assert_eq!(monitor.consecutive_failures(), 2);
    }

    // ---------------------------------------------------------------
    // Display path
    // ---------------------------------------------------------------
    #[test]
    fn spectrum_bars_for_every_second_block() {
        let ring = DmaRing::new();
        let source = I2sSource::new(&ring, tone_dma(&ring, 100_000.0), &config()).unwrap();
        let mut monitor = NoiseMonitor::<_, LEN>::new(source, config()).unwrap();
        let mut sink = RecordingSink::default();

        let peak = {
            monitor.poll(&mut sink).unwrap();
            monitor.spectrum()[5]
        };
        let view = SpectrumView::new(peak, 63);
        let mut divider = RefreshDivider::new(2);
        let mut redraws = 0;
        let mut columns = [0u8; 40];

        for _ in 0..4 {
            monitor.poll(&mut sink).unwrap();
            if divider.tick() {
                redraws += 1;
                let written = view.bar_heights(monitor.spectrum(), &mut columns);
                assert_eq!(written, LEN / 2 - 1);
                // Column 0 is bin 1; the tone bar is in column 4.
                let tallest = (0..written).max_by_key(|&c| columns[c]).unwrap();
                assert_eq!(tallest, 4);
                assert!(columns[4] >= 60);
            }
        }
        assert_eq!(redraws, 2);
    }
}
