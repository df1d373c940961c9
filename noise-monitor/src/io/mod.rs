//! DMA-driven audio input.
//!
//! ## Components
//!
//! | Item | Context | Description |
//! |------|---------|-------------|
//! | [`DmaRing`] | ISR → task | Lock-free ring of completed DMA receive buffers |
//! | [`I2sSource`] | task | Blocking [`SampleSource`](crate::source::SampleSource) over a `DmaRing` |
//!
//! ## DMA Buffer Layout
//!
//! The I2S receiver runs in mono (right slot only) with 32-bit slots:
//! - Each `i32` = one sample, microphone data left-justified
//! - The driver cycles through `COUNT` buffers of `LEN` slots
//! - The DMA-complete ISR hands each finished buffer to [`DmaRing::complete`]

pub mod dma_ring;
#[cfg(feature = "dma")]
pub mod i2s_source;

pub use dma_ring::DmaRing;
#[cfg(feature = "dma")]
pub use i2s_source::I2sSource;
