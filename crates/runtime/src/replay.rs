use std::io::{self, Write};

use core_sim::{SimulationConfig, SimulationRun};

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

pub const REPLAY_CSV_HEADER: &str =
    "step,value,initial_investment,stop_loss_level,triggered\n";

pub struct ReplayCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReplayCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(REPLAY_CSV_HEADER.as_bytes())
    }

    /// One row per path step. `triggered` is true from the trigger step onwards.
    pub fn append_run(&mut self, run: &SimulationRun, config: &SimulationConfig) -> io::Result<()> {
        let trigger_step = run.stop_loss.trigger_step();
        let stop_loss_level = config.stop_loss_level();

        for (step, value) in run.path.values().iter().enumerate() {
            let triggered = trigger_step.is_some_and(|trigger_step| step >= trigger_step);
            writeln!(
                self.writer,
                "{step},{value},{},{stop_loss_level},{triggered}",
                config.initial_investment
            )?;
        }
        Ok(())
    }

    pub fn write_run_and_log(
        &mut self,
        run: &SimulationRun,
        config: &SimulationConfig,
        run_log_writer: &mut dyn RunLogWriter,
    ) -> io::Result<()> {
        self.write_header()?;
        self.append_run(run, config)?;
        self.writer.flush()?;
        run_log_writer.write(RunLogEvent::new(
            config.horizon,
            RunLogEventKind::ReplayArtifactWritten,
            None,
        ));
        Ok(())
    }
}
