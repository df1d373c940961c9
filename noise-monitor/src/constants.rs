/// Number of samples per audio block (one FFT frame).
pub const AUDIO_BLOCK_SAMPLES: usize = 512;

/// Audio sample rate in Hz (I2S word-select clock).
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Number of 32-bit slots per DMA buffer.
pub const DMA_BUFFER_LEN: usize = 512;

/// Number of DMA buffers in the receive ring.
pub const DMA_BUFFER_COUNT: usize = 8;

/// Length of one reporting window in milliseconds.
pub const REPORT_PERIOD_MS: u32 = 10_000;

/// Offset subtracted from the average level after the dB conversion.
pub const AVERAGE_CALIBRATION_DB: f32 = 14.56;

/// Offset subtracted from the peak level after the dB conversion.
pub const PEAK_CALIBRATION_DB: f32 = 18.474;

/// Low-order bits of each 32-bit I2S slot below the microphone's 24-bit resolution.
pub const SAMPLE_DISCARD_BITS: u32 = 8;

/// Maximum time a capture waits for the DMA ring before giving up.
pub const CAPTURE_TIMEOUT_US: u32 = 100_000;

/// Sleep between polls of an empty DMA ring.
pub const CAPTURE_POLL_US: u32 = 250;

/// Consecutive failed captures before the device is reported unavailable.
pub const UNAVAILABLE_AFTER_FAILURES: u32 = 5;

/// Magnitude mapped to the full display height.
pub const DISPLAY_FULL_SCALE: f32 = 700_000.0;

/// Tallest spectrum bar in pixels (128x64 OLED, bottom row reserved).
pub const DISPLAY_HEIGHT: u8 = 63;

/// Redraw the spectrum every this many blocks.
pub const DISPLAY_REFRESH_EVERY: u32 = 2;
