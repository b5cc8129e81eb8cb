use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::{PostTriggerPolicy, SimulationConfig};
use crate::error::SimulationError;
use crate::generators::ReturnGenerator;
use crate::path::PortfolioPath;
use crate::state::{StopLossRule, StopLossState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub step: usize,
    /// `None` when the position is held at the floor and no return was drawn.
    pub drawn_return: Option<f64>,
    pub tentative_value: f64,
    pub value: f64,
    pub triggered_now: bool,
}

/// Stepwise simulation of one path. Owns its generator, its path and its stop-loss state.
#[derive(Debug)]
pub struct Simulation<R> {
    generator: ReturnGenerator<R>,
    rule: StopLossRule,
    post_trigger: PostTriggerPolicy,
    horizon: usize,
    path: PortfolioPath,
    stop_loss: StopLossState,
}

impl<R: Rng> Simulation<R> {
    pub fn new(config: &SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(Self {
            generator: ReturnGenerator::new(&config.returns, rng)?,
            rule: StopLossRule::new(config.initial_investment, config.stop_loss_fraction),
            post_trigger: config.post_trigger,
            horizon: config.horizon,
            path: PortfolioPath::with_initial(config.initial_investment, config.horizon),
            stop_loss: StopLossState::new(),
        })
    }

    pub fn step(&mut self) -> Option<StepOutcome> {
        let step = self.path.len();
        if step > self.horizon {
            return None;
        }

        let previous = self.path.final_value();
        if self.stop_loss.is_triggered() && self.post_trigger == PostTriggerPolicy::HoldFloor {
            self.path.push(previous);
            return Some(StepOutcome {
                step,
                drawn_return: None,
                tentative_value: previous,
                value: previous,
                triggered_now: false,
            });
        }

        let drawn_return = self.generator.next_return();
        let tentative_value = previous * (1.0 + drawn_return);
        let mut value = tentative_value;
        let mut triggered_now = false;

        if !self.stop_loss.is_triggered() && self.rule.is_breached(tentative_value) {
            value = self.rule.floor_from(previous);
            triggered_now = self.stop_loss.fire(step, value);
        }

        self.path.push(value);
        Some(StepOutcome {
            step,
            drawn_return: Some(drawn_return),
            tentative_value,
            value,
            triggered_now,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.path.len() > self.horizon
    }

    pub fn stop_loss(&self) -> StopLossState {
        self.stop_loss
    }

    pub fn path(&self) -> &PortfolioPath {
        &self.path
    }

    pub fn finish(mut self) -> SimulationRun {
        while self.step().is_some() {}

        SimulationRun {
            path: self.path,
            stop_loss: self.stop_loss,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub path: PortfolioPath,
    pub stop_loss: StopLossState,
}

impl SimulationRun {
    pub fn into_parts(self) -> (PortfolioPath, StopLossState) {
        (self.path, self.stop_loss)
    }

    pub fn summary(&self, config: &SimulationConfig) -> RunSummary {
        let final_value = self.path.final_value();
        let triggered = self.stop_loss.is_triggered();

        RunSummary {
            initial_investment: config.initial_investment,
            stop_loss_level: config.stop_loss_level(),
            final_value,
            stop_loss_triggered: triggered,
            trigger_step: self.stop_loss.trigger_step(),
            loss_pct: triggered
                .then(|| (1.0 - final_value / config.initial_investment) * 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub initial_investment: f64,
    pub stop_loss_level: f64,
    pub final_value: f64,
    pub stop_loss_triggered: bool,
    pub trigger_step: Option<usize>,
    pub loss_pct: Option<f64>,
}

pub struct SimulationEngine;

impl SimulationEngine {
    pub fn run(
        config: &SimulationConfig,
        seed: Option<u64>,
    ) -> Result<(PortfolioPath, StopLossState), SimulationError> {
        Self::simulate(config, seed).map(SimulationRun::into_parts)
    }

    pub fn simulate(
        config: &SimulationConfig,
        seed: Option<u64>,
    ) -> Result<SimulationRun, SimulationError> {
        Self::simulate_with_rng(config, seeded_rng(seed))
    }

    pub fn simulate_with_rng<R: Rng>(
        config: &SimulationConfig,
        rng: R,
    ) -> Result<SimulationRun, SimulationError> {
        Ok(Simulation::new(config, rng)?.finish())
    }
}

/// Seeded generator when `seed` is given, otherwise one seeded from OS entropy.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
