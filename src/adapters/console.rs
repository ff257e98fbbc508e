use crate::core::request::StreamState;
use crate::domain::model::{BatchResult, DeviceAddress, Progress, RequestRecord};
use crate::domain::ports::BatchObserver;
use std::io::Write;

/// What the carriage-return progress line talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressLabel {
    /// `Setting param i of M on unit j of N...`
    Parameters,
    /// `Setting TS <state> on unit j of N...`
    TransportStream(StreamState),
}

/// Prints progress, failures and the final count as the batch runs.
pub struct ConsoleReporter<W: Write> {
    out: W,
    label: ProgressLabel,
    echo_responses: bool,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout(label: ProgressLabel, echo_responses: bool) -> Self {
        Self::new(std::io::stdout(), label, echo_responses)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, label: ProgressLabel, echo_responses: bool) -> Self {
        Self {
            out,
            label,
            echo_responses,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = written {
            tracing::debug!("Could not write to console: {}", e);
        }
    }
}

impl<W: Write> BatchObserver for ConsoleReporter<W> {
    fn on_response(&mut self, _device: &DeviceAddress, body: &str) {
        if self.echo_responses {
            self.emit(&format!("\n>>>{}\n", body));
        }
    }

    fn on_success(&mut self, _record: &RequestRecord, progress: Progress) {
        let line = match self.label {
            ProgressLabel::Parameters => format!(
                "\rSetting param {} of {} on unit {} of {}...    ",
                progress.change_index,
                progress.change_total,
                progress.device_index,
                progress.device_total
            ),
            ProgressLabel::TransportStream(state) => format!(
                "\rSetting TS {} on unit {} of {}...    ",
                state, progress.device_index, progress.device_total
            ),
        };
        self.emit(&line);
    }

    fn on_failure(&mut self, record: &RequestRecord, _progress: Progress) {
        let line = match self.label {
            ProgressLabel::Parameters => format!(
                "\n{} {} ERROR {}\n",
                record.change, record.device, record.outcome
            ),
            ProgressLabel::TransportStream(_) => {
                format!("\n{} ERROR {}\n", record.device, record.outcome)
            }
        };
        self.emit(&line);
    }

    fn on_complete(&mut self, result: &BatchResult) {
        self.emit(&format!(
            "\nCompleted with {} errors.\n\n",
            result.failure_count()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ParameterChange, RpcOutcome};

    fn record(device: &str, outcome: RpcOutcome) -> RequestRecord {
        RequestRecord {
            device: device.into(),
            change: ParameterChange::new("/x/y", "5"),
            outcome,
        }
    }

    fn progress(device_index: usize) -> Progress {
        Progress {
            change_index: 1,
            change_total: 1,
            device_index,
            device_total: 2,
        }
    }

    #[test]
    fn test_parameter_run_output() {
        let mut reporter = ConsoleReporter::new(Vec::new(), ProgressLabel::Parameters, false);
        let ok = record("10.0.0.1", RpcOutcome::Success(String::new()));
        let failed = record("10.0.0.2", RpcOutcome::RemoteFault("locked".to_string()));

        reporter.on_response(&ok.device, "<ignored/>");
        reporter.on_success(&ok, progress(1));
        reporter.on_failure(&failed, progress(2));
        let mut result = BatchResult::new();
        result.record(ok);
        result.record(failed);
        reporter.on_complete(&result);

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            output,
            "\rSetting param 1 of 1 on unit 1 of 2...    \
             \n[/x/y 5] 10.0.0.2 ERROR locked\n\
             \nCompleted with 1 errors.\n\n"
        );
    }

    #[test]
    fn test_transport_stream_output_and_echo() {
        let mut reporter = ConsoleReporter::new(
            Vec::new(),
            ProgressLabel::TransportStream(StreamState::Online),
            true,
        );
        let ok = record("10.0.0.1", RpcOutcome::Success(String::new()));
        let failed = record(
            "10.0.0.2",
            RpcOutcome::TransportError("request timed out: deadline".to_string()),
        );

        reporter.on_response(&ok.device, "<r/>");
        reporter.on_success(&ok, progress(1));
        reporter.on_failure(&failed, progress(2));

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(output.starts_with("\n>>><r/>\n"));
        assert!(output.contains("\rSetting TS Online on unit 1 of 2...    "));
        assert!(output.contains("\n10.0.0.2 ERROR request timed out: deadline\n"));
    }
}
