//! Fixed-size audio sample block.

use core::ops::{Deref, DerefMut};

use crate::constants::AUDIO_BLOCK_SAMPLES;

/// One block of `N` consecutive samples captured from the peripheral.
///
/// Samples are the raw 32-bit I2S slot values arithmetic-shifted right by the
/// configured number of sub-resolution bits. The block is reused as the
/// capture buffer for every cycle; its length never changes.
#[derive(Clone, PartialEq, Eq, Debug)]
#[repr(C, align(4))]
pub struct AudioBlock<const N: usize = AUDIO_BLOCK_SAMPLES> {
    samples: [i32; N],
}

impl<const N: usize> AudioBlock<N> {
    /// A block of silence.
    pub const fn zeroed() -> Self {
        AudioBlock { samples: [0; N] }
    }

    /// Wrap an existing sample array.
    pub const fn from_samples(samples: [i32; N]) -> Self {
        AudioBlock { samples }
    }

    /// Number of samples (always `N`).
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> Default for AudioBlock<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> Deref for AudioBlock<N> {
    type Target = [i32; N];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl<const N: usize> DerefMut for AudioBlock<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.samples
    }
}
