//! Infrastructure implementations of the `OutputSink` port.
//!
//! `VsoSink` speaks the Azure Pipelines logging-command protocol on stdout;
//! `RecordingSink` keeps outputs and warnings in memory for the `--json` report.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

use crate::application::ports::OutputSink;

/// Writes `##vso[...]` logging commands.
pub struct VsoSink<W: Write> {
    out: Mutex<W>,
}

impl VsoSink<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> VsoSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn emit(&self, line: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "failed to write logging command");
        }
    }
}

impl<W: Write> OutputSink for VsoSink<W> {
    fn set_output(&self, name: &str, value: &str) {
        self.emit(&format!(
            "##vso[task.setvariable variable={};isOutput=true]{}",
            escape_property(name),
            escape_data(value)
        ));
    }

    fn warn(&self, message: &str) {
        self.emit(&format!(
            "##vso[task.logissue type=warning]{}",
            escape_data(message)
        ));
    }

    fn complete(&self, succeeded: bool, message: &str) {
        if !succeeded {
            self.emit(&format!(
                "##vso[task.logissue type=error]{}",
                escape_data(message)
            ));
        }
        let result = if succeeded { "Succeeded" } else { "Failed" };
        self.emit(&format!(
            "##vso[task.complete result={result};]{}",
            escape_data(message)
        ));
    }
}

/// Terminal status and outputs captured from one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: Option<bool>,
    pub message: String,
    pub outputs: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

/// In-memory sink used for `--json` output and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    report: Mutex<RunReport>,
}

impl RecordingSink {
    #[must_use]
    pub fn report(&self) -> RunReport {
        self.report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for RecordingSink {
    fn set_output(&self, name: &str, value: &str) {
        self.report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .outputs
            .insert(name.to_string(), value.to_string());
    }

    fn warn(&self, message: &str) {
        self.report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .warnings
            .push(message.to_string());
    }

    fn complete(&self, succeeded: bool, message: &str) {
        let mut report = self
            .report
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        report.succeeded = Some(succeeded);
        report.message = message.to_string();
    }
}

// ── Escaping ─────────────────────────────────────────────────────────────────

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%AZP25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(';', "%3B").replace(']', "%5D")
}
