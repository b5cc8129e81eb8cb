use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use core_sim::{
    AssetCatalog, CombinationPolicy, PostTriggerPolicy, ReturnSource, RunSummary,
    SimulationConfig, SimulationError, DEFAULT_HORIZON, DEFAULT_INITIAL_INVESTMENT,
    DEFAULT_MEAN_RETURN, DEFAULT_STOP_LOSS_FRACTION, DEFAULT_VOLATILITY,
};
use runtime::logging::TracingRunLogWriter;
use serde::{Deserialize, Serialize};

use crate::state::{AppState, StartRunError};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(start_run))
        .route("/assets", get(list_assets))
        .with_state(state)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    pub initial_investment: f64,
    /// Stop-loss as a fraction of the initial investment, e.g. 0.10 for 10%.
    pub stop_loss_pct: f64,
    pub horizon: usize,
    pub seed: Option<u64>,
    /// Selecting assets switches the run to per-asset mode.
    pub assets: Option<Vec<String>>,
    pub mean: f64,
    pub volatility: f64,
    pub combination: CombinationPolicy,
    pub post_trigger: PostTriggerPolicy,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            stop_loss_pct: DEFAULT_STOP_LOSS_FRACTION,
            horizon: DEFAULT_HORIZON,
            seed: None,
            assets: None,
            mean: DEFAULT_MEAN_RETURN,
            volatility: DEFAULT_VOLATILITY,
            combination: CombinationPolicy::default(),
            post_trigger: PostTriggerPolicy::default(),
        }
    }
}

impl RunRequest {
    pub fn to_config(&self, catalog: &AssetCatalog) -> SimulationConfig {
        let returns = match &self.assets {
            Some(selected) => ReturnSource::PerAsset {
                profiles: catalog.clone(),
                selected: selected.clone(),
                combination: self.combination,
            },
            None => ReturnSource::Aggregate {
                mean: self.mean,
                volatility: self.volatility,
            },
        };

        SimulationConfig {
            initial_investment: self.initial_investment,
            stop_loss_fraction: self.stop_loss_pct,
            horizon: self.horizon,
            returns,
            post_trigger: self.post_trigger,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunResponse {
    run_id: u64,
    values: Vec<f64>,
    #[serde(flatten)]
    summary: RunSummary,
}

#[derive(Debug, Serialize)]
struct AssetEntry {
    id: String,
    mean_return: f64,
    volatility: f64,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    StartRun(#[from] StartRunError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Simulation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StartRun(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });

        (status, Json(body)).into_response()
    }
}

async fn start_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let config = request.to_config(state.catalog());
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "rejected simulation request");
        return Err(err.into());
    }

    let run_id = state.start_run()?;
    let mut log_writer = TracingRunLogWriter::new(run_id);
    let run = runtime::run_logged(&config, request.seed, &mut log_writer)?;
    let summary = run.summary(&config);
    let location = format!("/runs/{run_id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RunResponse {
            run_id,
            values: run.path.into_values(),
            summary,
        }),
    ))
}

async fn list_assets(State(state): State<AppState>) -> impl IntoResponse {
    let assets: Vec<AssetEntry> = state
        .catalog()
        .iter()
        .map(|(id, profile)| AssetEntry {
            id: id.to_owned(),
            mean_return: profile.mean_return,
            volatility: profile.volatility,
        })
        .collect();

    Json(assets)
}
