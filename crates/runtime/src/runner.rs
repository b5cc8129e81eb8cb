use core_sim::{seeded_rng, Simulation, SimulationConfig, SimulationError, SimulationRun};
use rand::Rng;

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

pub fn run_logged(
    config: &SimulationConfig,
    seed: Option<u64>,
    log_writer: &mut dyn RunLogWriter,
) -> Result<SimulationRun, SimulationError> {
    run_logged_with_rng(config, seeded_rng(seed), log_writer)
}

pub fn run_logged_with_rng<R: Rng>(
    config: &SimulationConfig,
    rng: R,
    log_writer: &mut dyn RunLogWriter,
) -> Result<SimulationRun, SimulationError> {
    let mut simulation = Simulation::new(config, rng)?;
    log_writer.write(RunLogEvent::new(
        0,
        RunLogEventKind::RunStarted,
        Some(config.initial_investment),
    ));

    while let Some(outcome) = simulation.step() {
        log_writer.write(RunLogEvent::new(
            outcome.step,
            RunLogEventKind::StepValued,
            Some(outcome.value),
        ));
        if outcome.triggered_now {
            log_writer.write(RunLogEvent::new(
                outcome.step,
                RunLogEventKind::StopLossTriggered,
                Some(outcome.value),
            ));
        }
    }

    let run = simulation.finish();
    log_writer.write(RunLogEvent::new(
        config.horizon,
        RunLogEventKind::RunCompleted,
        Some(run.path.final_value()),
    ));
    Ok(run)
}
