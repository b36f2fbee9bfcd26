/// ProgressReporter port for operator-facing progress
///
/// Distinct from [`super::LogSink`]: progress is what a person watching the
/// terminal sees, logs are what is kept on disk. Download and scan workers
/// report from the pool concurrently.
pub trait ProgressReporter: Send + Sync {
    /// A stage banner or other one-off message
    fn report(&self, message: &str);

    /// `current` of `total` items finished, with what just finished
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    fn report_error(&self, message: &str);

    /// The run is over; final line of output
    fn report_completion(&self, message: &str);
}
