//! Spectrum bar scaling for a small fixed-height display.
//!
//! The monitor itself draws nothing. [`SpectrumView`] turns a magnitude
//! half-spectrum into one bar height per column, and [`RefreshDivider`]
//! limits how often the caller redraws.

use crate::constants::{DISPLAY_FULL_SCALE, DISPLAY_HEIGHT, DISPLAY_REFRESH_EVERY};

/// Linear mapping of magnitudes onto pixel heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrumView {
    /// Magnitude drawn at full height; larger values are clipped.
    pub full_scale: f32,
    /// Height of a full-scale bar in pixels.
    pub height: u8,
    /// First bin drawn (1 skips DC).
    pub first_bin: usize,
}

impl SpectrumView {
    pub const fn new(full_scale: f32, height: u8) -> Self {
        SpectrumView {
            full_scale,
            height,
            first_bin: 1,
        }
    }

    /// Height in pixels for one magnitude.
    pub fn bar_height(&self, magnitude: f32) -> u8 {
        if magnitude.is_nan() || magnitude <= 0.0 || self.full_scale.is_nan() || self.full_scale <= 0.0 {
            return 0;
        }
        let scaled = magnitude / self.full_scale * self.height as f32;
        if scaled >= self.height as f32 {
            self.height
        } else {
            scaled as u8
        }
    }

    /// Fill `columns` with bar heights starting at `first_bin`.
    ///
    /// Returns the number of columns written: the smaller of `columns.len()`
    /// and the number of bins from `first_bin` on.
    pub fn bar_heights(&self, magnitude: &[f32], columns: &mut [u8]) -> usize {
        let bins = magnitude.get(self.first_bin..).unwrap_or(&[]);
        let mut written = 0;
        for (col, &m) in columns.iter_mut().zip(bins.iter()) {
            *col = self.bar_height(m);
            written += 1;
        }
        written
    }
}

impl Default for SpectrumView {
    fn default() -> Self {
        Self::new(DISPLAY_FULL_SCALE, DISPLAY_HEIGHT)
    }
}

/// Fires on the first tick and then every `every` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDivider {
    every: u32,
    count: u32,
}

impl RefreshDivider {
    /// `every` of zero is treated as one (refresh on every tick).
    pub const fn new(every: u32) -> Self {
        RefreshDivider {
            every: if every == 0 { 1 } else { every },
            count: 0,
        }
    }

    /// Advance one block; `true` when the display should be redrawn.
    pub fn tick(&mut self) -> bool {
        let fire = self.count == 0;
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
        }
        fire
    }
}

impl Default for RefreshDivider {
    fn default() -> Self {
        Self::new(DISPLAY_REFRESH_EVERY)
    }
}
