use std::{
    env,
    net::{AddrParseError, SocketAddr},
};

use core_sim::{
    AssetCatalog, PostTriggerPolicy, SimulationConfig, DEFAULT_HORIZON,
    DEFAULT_INITIAL_INVESTMENT, MAX_HORIZON,
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MODE: RunMode = RunMode::Serve;
const DEFAULT_REPLAY_OUTPUT_PATH: &str = "artifacts/replay.csv";
const DEFAULT_STOP_LOSS_PCT: f64 = 10.0;
const ASSET_SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Serve,
    Sim,
}

impl RunMode {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "serve" => Some(Self::Serve),
            "sim" => Some(Self::Sim),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serve => "serve",
            Self::Sim => "sim",
        }
    }
}

fn parse_post_trigger(value: &str) -> Option<PostTriggerPolicy> {
    match value {
        "keep-compounding" => Some(PostTriggerPolicy::KeepCompounding),
        "hold-floor" => Some(PostTriggerPolicy::HoldFloor),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub mode: RunMode,
    pub replay_output_path: String,
    pub initial_investment: f64,
    pub stop_loss_pct: f64,
    pub horizon: usize,
    pub seed: Option<u64>,
    pub assets: Option<Vec<String>>,
    pub post_trigger: PostTriggerPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LAB_SERVER_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(#[source] AddrParseError),
    #[error("LAB_SERVER_MODE must be one of: serve, sim")]
    InvalidMode,
    #[error("LAB_SERVER_REPLAY_OUTPUT must not be empty or whitespace")]
    InvalidReplayOutputPath,
    #[error("LAB_INITIAL_INVESTMENT must be a finite amount greater than 0")]
    InvalidInitialInvestment,
    #[error("LAB_STOP_LOSS_PCT must be a finite percentage greater than 0 and at most 100")]
    InvalidStopLossPct,
    #[error("LAB_HORIZON must be a whole number of steps between 1 and {}", MAX_HORIZON)]
    InvalidHorizon,
    #[error("LAB_SEED must be an unsigned 64-bit integer")]
    InvalidSeed,
    #[error("LAB_ASSETS must list at least one asset identifier separated by ';'")]
    InvalidAssets,
    #[error("LAB_POST_TRIGGER must be one of: keep-compounding, hold-floor")]
    InvalidPostTrigger,
    #[error("{0} contains non-unicode data")]
    NonUnicode(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match read_env("LAB_SERVER_ADDR")? {
            Some(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            None => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
        };

        let mode = match read_env("LAB_SERVER_MODE")? {
            Some(value) => RunMode::parse(value.as_str()).ok_or(ConfigError::InvalidMode)?,
            None => DEFAULT_MODE,
        };

        let replay_output_path = match read_env("LAB_SERVER_REPLAY_OUTPUT")? {
            Some(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidReplayOutputPath);
                }
                value
            }
            None => DEFAULT_REPLAY_OUTPUT_PATH.to_owned(),
        };

        let initial_investment = match read_env("LAB_INITIAL_INVESTMENT")? {
            Some(value) => match value.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() && parsed > 0.0 => parsed,
                _ => return Err(ConfigError::InvalidInitialInvestment),
            },
            None => DEFAULT_INITIAL_INVESTMENT,
        };

        let stop_loss_pct = parse_percentage_env(
            "LAB_STOP_LOSS_PCT",
            DEFAULT_STOP_LOSS_PCT,
            ConfigError::InvalidStopLossPct,
        )?;

        let horizon = match read_env("LAB_HORIZON")? {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(parsed) if (1..=MAX_HORIZON).contains(&parsed) => parsed,
                _ => return Err(ConfigError::InvalidHorizon),
            },
            None => DEFAULT_HORIZON,
        };

        let seed = match read_env("LAB_SEED")? {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            None => None,
        };

        let assets = match read_env("LAB_ASSETS")? {
            Some(value) => Some(parse_asset_list(&value).ok_or(ConfigError::InvalidAssets)?),
            None => None,
        };

        let post_trigger = match read_env("LAB_POST_TRIGGER")? {
            Some(value) => {
                parse_post_trigger(value.as_str()).ok_or(ConfigError::InvalidPostTrigger)?
            }
            None => PostTriggerPolicy::default(),
        };

        Ok(Self {
            listen_addr,
            mode,
            replay_output_path,
            initial_investment,
            stop_loss_pct,
            horizon,
            seed,
            assets,
            post_trigger,
        })
    }

    pub fn simulation_config(&self, catalog: &AssetCatalog) -> SimulationConfig {
        let stop_loss_fraction = self.stop_loss_pct / 100.0;
        let config = match &self.assets {
            Some(selected) => SimulationConfig::per_asset(
                self.initial_investment,
                stop_loss_fraction,
                catalog.clone(),
                selected.iter().cloned(),
            ),
            None => SimulationConfig {
                initial_investment: self.initial_investment,
                stop_loss_fraction,
                ..SimulationConfig::default()
            },
        };

        config
            .with_horizon(self.horizon)
            .with_post_trigger(self.post_trigger)
    }
}

fn read_env(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NonUnicode(key)),
    }
}

fn parse_asset_list(value: &str) -> Option<Vec<String>> {
    let assets: Vec<String> = value
        .split(ASSET_SEPARATOR)
        .map(str::trim)
        .filter(|asset| !asset.is_empty())
        .map(str::to_owned)
        .collect();

    (!assets.is_empty()).then_some(assets)
}

fn parse_percentage_env(
    key: &'static str,
    default_value: f64,
    invalid_error: ConfigError,
) -> Result<f64, ConfigError> {
    match read_env(key)? {
        Some(value) => {
            let parsed = match value.trim().parse::<f64>() {
                Ok(parsed) => parsed,
                Err(_) => return Err(invalid_error),
            };
            if !parsed.is_finite() || parsed <= 0.0 || parsed > 100.0 {
                return Err(invalid_error);
            }
            Ok(parsed)
        }
        None => Ok(default_value),
    }
}
