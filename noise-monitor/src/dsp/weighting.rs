//! A-weighting biquad.
//!
//! A fixed second-order IIR section approximating the A-weighting curve at
//! 44.1 kHz. The coefficients are part of the design and are not
//! configurable.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feed-forward coefficients `b0, b1, b2`.
pub const A_WEIGHTING_B: [f64; 3] = [0.255741125204258, -0.511482250408515, 0.255741125204258];

/// Feedback coefficients `a0, a1, a2` (`a0` is 1).
pub const A_WEIGHTING_A: [f64; 3] = [1.0, -1.734725768809275, 0.766006600943264];

/// When the filter's delay registers are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightingMode {
    /// Zero the registers at the start of every call.
    #[default]
    ResetPerCall,
    /// Carry the registers from one call into the next.
    Persistent,
}

/// Delay registers: two past inputs and two past outputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// A-weighting filter.
///
/// # Example
/// ```ignore
/// let mut filter = AWeighting::new(WeightingMode::ResetPerCall);
/// filter.apply(spectrum, &mut weighted);
/// ```
pub struct AWeighting {
    state: FilterState,
    mode: WeightingMode,
}

impl AWeighting {
    /// Create a filter with zeroed registers.
    pub const fn new(mode: WeightingMode) -> Self {
        AWeighting {
            state: FilterState { x1: 0.0, x2: 0.0, y1: 0.0, y2: 0.0 },
            mode,
        }
    }

    pub fn mode(&self) -> WeightingMode {
        self.mode
    }

    /// Current delay registers.
    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Zero the delay registers.
    pub fn reset(&mut self) {
        self.state = FilterState::default();
    }

    /// Filter `input` into `output`.
    ///
    /// # Panics
    ///
    /// If the slices differ in length.
    pub fn apply(&mut self, input: &[f32], output: &mut [f32]) {
        assert_eq!(input.len(), output.len(), "weighting input/output length mismatch");
        self.begin();
        for (y, &x) in output.iter_mut().zip(input.iter()) {
            *y = self.tick(x as f64) as f32;
        }
    }

    /// Filter `signal` in place.
    pub fn apply_in_place(&mut self, signal: &mut [f32]) {
        self.begin();
        for s in signal.iter_mut() {
            *s = self.tick(*s as f64) as f32;
        }
    }

    fn begin(&mut self) {
        if self.mode == WeightingMode::ResetPerCall {
            self.reset();
        }
    }

    #[inline(always)]
    fn tick(&mut self, x0: f64) -> f64 {
        let [b0, b1, b2] = A_WEIGHTING_B;
        let [_, a1, a2] = A_WEIGHTING_A;
        let s = &mut self.state;
        let y0 = b0 * x0 + b1 * s.x1 + b2 * s.x2 - a1 * s.y1 - a2 * s.y2;
        s.x2 = s.x1;
        s.x1 = x0;
        s.y2 = s.y1;
        s.y1 = y0;
        y0
    }
}

impl Default for AWeighting {
    fn default() -> Self {
        Self::new(WeightingMode::default())
    }
}
