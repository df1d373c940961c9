use crate::aggregate::DecibelReport;

/// Consumer of completed measurements (uploader, serial log, display, ...).
///
/// Encoding and transport are the implementor's business.
pub trait ReportSink {
    /// Error type for delivery failures.
    type Error;

    /// Deliver the levels of one completed reporting window.
    fn report(&mut self, report: &DecibelReport) -> Result<(), Self::Error>;

    /// The audio peripheral has failed `consecutive_failures` captures in a row.
    fn device_unavailable(&mut self, consecutive_failures: u32) -> Result<(), Self::Error>;
}

impl<R: ReportSink + ?Sized> ReportSink for &mut R {
    type Error = R::Error;

    fn report(&mut self, report: &DecibelReport) -> Result<(), Self::Error> {
        (**self).report(report)
    }

    fn device_unavailable(&mut self, consecutive_failures: u32) -> Result<(), Self::Error> {
        (**self).device_unavailable(consecutive_failures)
    }
}
