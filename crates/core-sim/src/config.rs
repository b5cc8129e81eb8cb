use std::collections::HashSet;

use crate::assets::{AssetCatalog, AssetProfile};
use crate::error::{ConfigViolation, SimulationError};

pub const DEFAULT_HORIZON: usize = 60;
/// Longest run accepted by `validate`; the path is allocated up front.
pub const MAX_HORIZON: usize = 10_000;
pub const DEFAULT_INITIAL_INVESTMENT: f64 = 1_000_000.0;
pub const DEFAULT_STOP_LOSS_FRACTION: f64 = 0.10;
pub const DEFAULT_MEAN_RETURN: f64 = 0.01;
pub const DEFAULT_VOLATILITY: f64 = 0.05;

/// What happens to the position on the steps after the stop-loss fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostTriggerPolicy {
    /// Keep applying sampled returns to the floored value.
    #[default]
    KeepCompounding,
    /// Liquidate and hold: the value stays at the floor for the rest of the run.
    HoldFloor,
}

/// How per-asset draws for one step become the step's portfolio return.
///
/// `Additive` sums the draws, which is not a weighted portfolio return: mean and
/// volatility both grow with the number of selected assets. `Compounded` applies
/// each draw to the running value in selection order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinationPolicy {
    #[default]
    Additive,
    Compounded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReturnSource {
    Aggregate {
        mean: f64,
        volatility: f64,
    },
    PerAsset {
        profiles: AssetCatalog,
        selected: Vec<String>,
        combination: CombinationPolicy,
    },
}

impl Default for ReturnSource {
    fn default() -> Self {
        Self::Aggregate {
            mean: DEFAULT_MEAN_RETURN,
            volatility: DEFAULT_VOLATILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_investment: f64,
    pub stop_loss_fraction: f64,
    pub horizon: usize,
    pub returns: ReturnSource,
    pub post_trigger: PostTriggerPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            stop_loss_fraction: DEFAULT_STOP_LOSS_FRACTION,
            horizon: DEFAULT_HORIZON,
            returns: ReturnSource::default(),
            post_trigger: PostTriggerPolicy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn aggregate(
        initial_investment: f64,
        stop_loss_fraction: f64,
        mean: f64,
        volatility: f64,
    ) -> Self {
        Self {
            initial_investment,
            stop_loss_fraction,
            returns: ReturnSource::Aggregate { mean, volatility },
            ..Self::default()
        }
    }

    pub fn per_asset<I, S>(
        initial_investment: f64,
        stop_loss_fraction: f64,
        profiles: AssetCatalog,
        selected: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            initial_investment,
            stop_loss_fraction,
            returns: ReturnSource::PerAsset {
                profiles,
                selected: selected.into_iter().map(Into::into).collect(),
                combination: CombinationPolicy::default(),
            },
            ..Self::default()
        }
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_post_trigger(mut self, post_trigger: PostTriggerPolicy) -> Self {
        self.post_trigger = post_trigger;
        self
    }

    /// Changes the combination policy. Has no effect in aggregate mode.
    pub fn with_combination(mut self, policy: CombinationPolicy) -> Self {
        if let ReturnSource::PerAsset { combination, .. } = &mut self.returns {
            *combination = policy;
        }
        self
    }

    /// Portfolio value below which the stop-loss fires.
    pub fn stop_loss_level(&self) -> f64 {
        self.initial_investment * (1.0 - self.stop_loss_fraction)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.initial_investment.is_finite() || self.initial_investment <= 0.0 {
            return Err(ConfigViolation::InitialInvestment(self.initial_investment).into());
        }
        if !self.stop_loss_fraction.is_finite()
            || self.stop_loss_fraction <= 0.0
            || self.stop_loss_fraction > 1.0
        {
            return Err(ConfigViolation::StopLossFraction(self.stop_loss_fraction).into());
        }
        if self.horizon == 0 || self.horizon > MAX_HORIZON {
            return Err(ConfigViolation::Horizon(self.horizon).into());
        }

        match &self.returns {
            ReturnSource::Aggregate { mean, volatility } => {
                validate_profile("aggregate", &AssetProfile::new(*mean, *volatility))?;
            }
            ReturnSource::PerAsset {
                profiles, selected, ..
            } => {
                if selected.is_empty() {
                    return Err(ConfigViolation::EmptyAssetSelection.into());
                }

                let mut seen = HashSet::with_capacity(selected.len());
                for id in selected {
                    if !seen.insert(id.as_str()) {
                        return Err(ConfigViolation::DuplicateAsset(id.clone()).into());
                    }
                    let profile = profiles
                        .get(id)
                        .ok_or_else(|| ConfigViolation::UnknownAsset(id.clone()))?;
                    validate_profile(id, profile)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_profile(source_name: &str, profile: &AssetProfile) -> Result<(), ConfigViolation> {
    if !profile.mean_return.is_finite() {
        return Err(ConfigViolation::MeanReturn {
            source_name: source_name.to_string(),
            value: profile.mean_return,
        });
    }
    if !profile.volatility.is_finite() || profile.volatility < 0.0 {
        return Err(ConfigViolation::Volatility {
            source_name: source_name.to_string(),
            value: profile.volatility,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        CombinationPolicy, PostTriggerPolicy, ReturnSource, SimulationConfig, MAX_HORIZON,
    };
    use crate::assets::{AssetCatalog, AssetProfile};
    use crate::error::ConfigViolation;

    fn violation_of(config: &SimulationConfig) -> ConfigViolation {
        config
            .validate()
            .expect_err("config should be rejected")
            .violation()
            .clone()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_stop_loss_fraction() {
        let config = SimulationConfig::aggregate(1_000_000.0, 0.0, 0.01, 0.05);
        assert_eq!(violation_of(&config), ConfigViolation::StopLossFraction(0.0));
    }

    #[test]
    fn rejects_stop_loss_fraction_above_one() {
        let config = SimulationConfig::aggregate(1_000_000.0, 1.5, 0.01, 0.05);
        assert_eq!(violation_of(&config), ConfigViolation::StopLossFraction(1.5));
    }

    #[test]
    fn accepts_full_stop_loss_fraction() {
        let config = SimulationConfig::aggregate(1_000_000.0, 1.0, 0.01, 0.05);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_horizon() {
        let config = SimulationConfig::default().with_horizon(0);
        assert_eq!(violation_of(&config), ConfigViolation::Horizon(0));
    }

    #[test]
    fn rejects_horizon_above_maximum() {
        let config = SimulationConfig::default().with_horizon(MAX_HORIZON + 1);
        assert_eq!(violation_of(&config), ConfigViolation::Horizon(MAX_HORIZON + 1));

        let config = SimulationConfig::default().with_horizon(usize::MAX);
        assert_eq!(violation_of(&config), ConfigViolation::Horizon(usize::MAX));
    }

    #[test]
    fn accepts_maximum_horizon() {
        let config = SimulationConfig::default().with_horizon(MAX_HORIZON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_negative_initial_investment() {
        let config = SimulationConfig::aggregate(-100.0, 0.1, 0.01, 0.05);
        assert_eq!(violation_of(&config), ConfigViolation::InitialInvestment(-100.0));
    }

    #[test]
    fn rejects_non_finite_initial_investment() {
        let config = SimulationConfig::aggregate(f64::INFINITY, 0.1, 0.01, 0.05);
        assert!(matches!(
            violation_of(&config),
            ConfigViolation::InitialInvestment(_)
        ));
    }

    #[test]
    fn rejects_negative_aggregate_volatility() {
        let config = SimulationConfig::aggregate(1_000.0, 0.1, 0.01, -0.05);
        assert_eq!(
            violation_of(&config),
            ConfigViolation::Volatility {
                source_name: "aggregate".to_string(),
                value: -0.05,
            }
        );
    }

    #[test]
    fn rejects_empty_asset_selection() {
        let config = SimulationConfig::per_asset(
            1_000.0,
            0.1,
            AssetCatalog::standard(),
            Vec::<String>::new(),
        );
        assert_eq!(violation_of(&config), ConfigViolation::EmptyAssetSelection);
    }

    #[test]
    fn rejects_unknown_asset() {
        let config = SimulationConfig::per_asset(1_000.0, 0.1, AssetCatalog::standard(), ["Gold"]);
        assert_eq!(
            violation_of(&config),
            ConfigViolation::UnknownAsset("Gold".to_string())
        );
    }

    #[test]
    fn rejects_duplicate_asset() {
        let config = SimulationConfig::per_asset(
            1_000.0,
            0.1,
            AssetCatalog::standard(),
            ["Real Estate (REITs)", "Real Estate (REITs)"],
        );
        assert_eq!(
            violation_of(&config),
            ConfigViolation::DuplicateAsset("Real Estate (REITs)".to_string())
        );
    }

    #[test]
    fn rejects_selected_profile_with_nan_mean() {
        let catalog = AssetCatalog::new().with_asset("broken", AssetProfile::new(f64::NAN, 0.1));
        let config = SimulationConfig::per_asset(1_000.0, 0.1, catalog, ["broken"]);
        assert!(matches!(
            violation_of(&config),
            ConfigViolation::MeanReturn { source_name, .. } if source_name == "broken"
        ));
    }

    #[test]
    fn unselected_invalid_profiles_are_ignored() {
        let catalog = AssetCatalog::standard()
            .with_asset("broken", AssetProfile::new(0.01, -1.0));
        let config =
            SimulationConfig::per_asset(1_000.0, 0.1, catalog, ["Bonds (US Treasury Bonds)"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn with_combination_only_applies_to_per_asset_mode() {
        let aggregate = SimulationConfig::default().with_combination(CombinationPolicy::Compounded);
        assert_eq!(aggregate.returns, ReturnSource::default());

        let per_asset = SimulationConfig::per_asset(
            1_000.0,
            0.1,
            AssetCatalog::standard(),
            ["Real Estate (REITs)"],
        )
        .with_combination(CombinationPolicy::Compounded);
        assert!(matches!(
            per_asset.returns,
            ReturnSource::PerAsset {
                combination: CombinationPolicy::Compounded,
                ..
            }
        ));
    }

    #[test]
    fn stop_loss_level_is_relative_to_initial_investment() {
        let config = SimulationConfig::aggregate(1_000_000.0, 0.25, 0.01, 0.05)
            .with_post_trigger(PostTriggerPolicy::HoldFloor);
        assert_eq!(config.stop_loss_level(), 750_000.0);
        assert_eq!(config.post_trigger, PostTriggerPolicy::HoldFloor);
    }
}
