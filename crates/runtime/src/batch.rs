use core_sim::{SimulationConfig, SimulationEngine, SimulationError, SimulationRun};
use rayon::prelude::*;

/// Runs one independent simulation per seed across the rayon pool.
///
/// Results are returned in seed order and are not aggregated.
pub fn run_batch(
    config: &SimulationConfig,
    seeds: &[u64],
) -> Result<Vec<SimulationRun>, SimulationError> {
    config.validate()?;

    seeds
        .par_iter()
        .map(|seed| SimulationEngine::simulate(config, Some(*seed)))
        .collect()
}
