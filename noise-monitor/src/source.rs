use crate::block::AudioBlock;
use crate::error::AcquisitionError;

/// A blocking producer of fixed-size audio blocks.
///
/// Implementations wait until exactly one block of `N` samples is available or
/// their maximum wait elapses. On error the contents of `block` are
/// unspecified and must not be used.
pub trait SampleSource<const N: usize> {
    /// Fill `block` with the next `N` samples in capture order.
    fn capture(&mut self, block: &mut AudioBlock<N>) -> Result<(), AcquisitionError>;
}

impl<S, const N: usize> SampleSource<N> for &mut S
where
    S: SampleSource<N> + ?Sized,
{
    fn capture(&mut self, block: &mut AudioBlock<N>) -> Result<(), AcquisitionError> {
        (**self).capture(block)
    }
}
