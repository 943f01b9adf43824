//! Application service: route run warnings to the pipeline as well as the
//! terminal.

use crate::application::ports::{OutputSink, ProgressReporter};

/// A [`ProgressReporter`] that also publishes every warning through an
/// [`OutputSink`], so best-effort failures show up in the run summary.
pub struct IssueReporter<'a, R, S> {
    reporter: &'a R,
    sink: &'a S,
}

impl<'a, R, S> IssueReporter<'a, R, S> {
    #[must_use]
    pub fn new(reporter: &'a R, sink: &'a S) -> Self {
        Self { reporter, sink }
    }
}

impl<R: ProgressReporter, S: OutputSink> ProgressReporter for IssueReporter<'_, R, S> {
    fn step(&self, message: &str) {
        self.reporter.step(message);
    }

    fn success(&self, message: &str) {
        self.reporter.success(message);
    }

    fn warn(&self, message: &str) {
        self.reporter.warn(message);
        self.sink.warn(message);
    }
}
