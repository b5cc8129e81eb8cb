use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::{CombinationPolicy, ReturnSource};
use crate::error::{ConfigViolation, SimulationError};

#[derive(Debug, Clone)]
enum ReturnModel {
    Aggregate(Normal<f64>),
    PerAsset {
        draws: Vec<Normal<f64>>,
        combination: CombinationPolicy,
    },
}

/// Draws one fractional portfolio return per step from an owned generator.
#[derive(Debug, Clone)]
pub struct ReturnGenerator<R> {
    rng: R,
    model: ReturnModel,
}

impl<R: Rng> ReturnGenerator<R> {
    pub fn new(source: &ReturnSource, rng: R) -> Result<Self, SimulationError> {
        let model = match source {
            ReturnSource::Aggregate { mean, volatility } => {
                ReturnModel::Aggregate(normal("aggregate", *mean, *volatility)?)
            }
            ReturnSource::PerAsset {
                profiles,
                selected,
                combination,
            } => {
                let draws = selected
                    .iter()
                    .map(|id| {
                        let profile = profiles
                            .get(id)
                            .ok_or_else(|| ConfigViolation::UnknownAsset(id.clone()))?;
                        normal(id, profile.mean_return, profile.volatility)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if draws.is_empty() {
                    return Err(ConfigViolation::EmptyAssetSelection.into());
                }

                ReturnModel::PerAsset {
                    draws,
                    combination: *combination,
                }
            }
        };

        Ok(Self { rng, model })
    }

    pub fn next_return(&mut self) -> f64 {
        match &self.model {
            ReturnModel::Aggregate(dist) => dist.sample(&mut self.rng),
            ReturnModel::PerAsset {
                draws,
                combination: CombinationPolicy::Additive,
            } => draws.iter().map(|dist| dist.sample(&mut self.rng)).sum(),
            ReturnModel::PerAsset {
                draws,
                combination: CombinationPolicy::Compounded,
            } => {
                let growth: f64 = draws
                    .iter()
                    .map(|dist| 1.0 + dist.sample(&mut self.rng))
                    .product();
                growth - 1.0
            }
        }
    }
}

fn normal(source_name: &str, mean: f64, volatility: f64) -> Result<Normal<f64>, ConfigViolation> {
    if !mean.is_finite() {
        return Err(ConfigViolation::MeanReturn {
            source_name: source_name.to_string(),
            value: mean,
        });
    }

    let invalid_volatility = || ConfigViolation::Volatility {
        source_name: source_name.to_string(),
        value: volatility,
    };
    // rand_distr 0.4 accepts a negative std_dev and mirrors the draws.
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(invalid_volatility());
    }

    Normal::new(mean, volatility).map_err(|_| invalid_volatility())
}
