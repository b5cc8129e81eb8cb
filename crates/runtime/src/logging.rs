#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    RunStarted,
    StepValued,
    StopLossTriggered,
    RunCompleted,
    ReplayArtifactWritten,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunLogEvent {
    pub step: usize,
    pub kind: RunLogEventKind,
    pub value: Option<f64>,
}

impl RunLogEvent {
    pub fn new(step: usize, kind: RunLogEventKind, value: Option<f64>) -> Self {
        Self { step, kind, value }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<RunLogEventKind> {
        self.events.iter().map(|event| event.kind).collect()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards run events to `tracing`, tagged with the run they belong to.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter {
    run_id: u64,
}

impl TracingRunLogWriter {
    pub fn new(run_id: u64) -> Self {
        Self { run_id }
    }
}

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        let run_id = self.run_id;
        let step = event.step;
        let value = event.value;

        match event.kind {
            RunLogEventKind::RunStarted => {
                tracing::info!(run_id, step, value = ?value, "simulation run started");
            }
            RunLogEventKind::StepValued => {
                tracing::debug!(run_id, step, value = ?value, "step valued");
            }
            RunLogEventKind::StopLossTriggered => {
                tracing::warn!(run_id, step, value = ?value, "stop-loss triggered");
            }
            RunLogEventKind::RunCompleted => {
                tracing::info!(run_id, step, value = ?value, "simulation run completed");
            }
            RunLogEventKind::ReplayArtifactWritten => {
                tracing::info!(run_id, step, "replay artifact written");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::Level;

    use super::{
        InMemoryRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter, TracingRunLogWriter,
    };

    #[test]
    fn in_memory_writer_keeps_events_in_order() {
        let mut writer = InMemoryRunLogWriter::new();
        writer.write(RunLogEvent::new(0, RunLogEventKind::RunStarted, Some(100.0)));
        writer.write(RunLogEvent::new(1, RunLogEventKind::StepValued, Some(101.0)));

        assert_eq!(
            writer.kinds(),
            vec![RunLogEventKind::RunStarted, RunLogEventKind::StepValued]
        );
        assert_eq!(writer.events()[1].value, Some(101.0));
    }

    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl CapturedOutput {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(str::to_owned)
                .collect()
        }
    }

    impl io::Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn line_with<'a>(lines: &'a [String], message: &str) -> &'a str {
        lines
            .iter()
            .find(|line| line.contains(message))
            .unwrap_or_else(|| panic!("no log line for {message:?} in {lines:#?}"))
    }

    #[test]
    fn tracing_writer_emits_each_event_at_its_level() {
        let output = CapturedOutput::default();
        let make_writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || make_writer.clone())
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut writer = TracingRunLogWriter::new(3);
            writer.write(RunLogEvent::new(0, RunLogEventKind::RunStarted, Some(100.0)));
            writer.write(RunLogEvent::new(1, RunLogEventKind::StepValued, Some(85.0)));
            writer.write(RunLogEvent::new(1, RunLogEventKind::StopLossTriggered, Some(90.0)));
            writer.write(RunLogEvent::new(1, RunLogEventKind::RunCompleted, Some(90.0)));
            writer.write(RunLogEvent::new(1, RunLogEventKind::ReplayArtifactWritten, None));
        });

        let lines = output.lines();
        assert_eq!(lines.len(), 5);
        assert!(line_with(&lines, "simulation run started").contains("INFO"));
        assert!(line_with(&lines, "step valued").contains("DEBUG"));
        assert!(line_with(&lines, "stop-loss triggered").contains("WARN"));
        assert!(line_with(&lines, "simulation run completed").contains("INFO"));
        assert!(line_with(&lines, "replay artifact written").contains("INFO"));
        assert!(lines.iter().all(|line| line.contains("run_id=3")));
        assert!(line_with(&lines, "stop-loss triggered").contains("value=Some(90.0)"));
    }
}
