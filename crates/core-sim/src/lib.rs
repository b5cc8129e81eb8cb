mod assets;
mod config;
mod engine;
mod error;
mod generators;
mod path;
mod state;

pub use assets::{AssetCatalog, AssetProfile};
pub use config::{
    CombinationPolicy, PostTriggerPolicy, ReturnSource, SimulationConfig, DEFAULT_HORIZON,
    DEFAULT_INITIAL_INVESTMENT, DEFAULT_MEAN_RETURN, DEFAULT_STOP_LOSS_FRACTION,
    DEFAULT_VOLATILITY, MAX_HORIZON,
};
pub use engine::{seeded_rng, RunSummary, Simulation, SimulationEngine, SimulationRun, StepOutcome};
pub use error::{ConfigViolation, SimulationError};
pub use generators::ReturnGenerator;
pub use path::PortfolioPath;
pub use state::{StopLossPhase, StopLossRule, StopLossState, StopLossTrigger};
