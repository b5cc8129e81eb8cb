use thiserror::Error;

use crate::config::MAX_HORIZON;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigViolation),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("initial_investment must be a finite value greater than 0, got {0}")]
    InitialInvestment(f64),
    #[error("stop_loss_fraction must be a finite value in (0, 1], got {0}")]
    StopLossFraction(f64),
    #[error("horizon must be between 1 and {} steps, got {0}", MAX_HORIZON)]
    Horizon(usize),
    #[error("mean return for {source_name} must be finite, got {value}")]
    MeanReturn { source_name: String, value: f64 },
    #[error("volatility for {source_name} must be finite and >= 0, got {value}")]
    Volatility { source_name: String, value: f64 },
    #[error("per-asset mode requires at least one selected asset")]
    EmptyAssetSelection,
    #[error("selected asset {0:?} is not in the asset profiles")]
    UnknownAsset(String),
    #[error("asset {0:?} is selected more than once")]
    DuplicateAsset(String),
}

impl SimulationError {
    pub fn violation(&self) -> &ConfigViolation {
        match self {
            Self::InvalidConfiguration(violation) => violation,
        }
    }
}
