use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use core_sim::{AssetCatalog, RunSummary};
use runtime::logging::TracingRunLogWriter;
use runtime::replay::ReplayCsvWriter;

use crate::config::Config;

const SIM_RUN_ID: u64 = 0;

pub fn run_once(config: &Config) -> Result<RunSummary, Box<dyn Error>> {
    let simulation_config = config.simulation_config(&AssetCatalog::standard());
    let mut log_writer = TracingRunLogWriter::new(SIM_RUN_ID);
    let run = runtime::run_logged(&simulation_config, config.seed, &mut log_writer)?;

    let replay_file = create_replay_output(&config.replay_output_path)?;
    ReplayCsvWriter::new(BufWriter::new(replay_file)).write_run_and_log(
        &run,
        &simulation_config,
        &mut log_writer,
    )?;

    let summary = run.summary(&simulation_config);
    tracing::info!("Final Portfolio Value: {}", format_currency(summary.final_value));
    match summary.loss_pct {
        Some(_) => tracing::warn!("{}", stop_loss_message(&summary)),
        None => tracing::info!("{}", stop_loss_message(&summary)),
    }
    Ok(summary)
}

fn create_replay_output(path: &str) -> Result<File, std::io::Error> {
    let replay_path = Path::new(path);

    if let Some(parent) = replay_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)?;
    }

    File::create(replay_path)
}

pub fn stop_loss_message(summary: &RunSummary) -> String {
    match summary.loss_pct {
        Some(loss_pct) => format!("Stop-Loss Triggered: You incurred a {loss_pct:.2}% loss."),
        None => "Stop-Loss was not triggered.".to_string(),
    }
}

/// Dollar amount with thousands separators and two decimals, e.g. `$1,234,567.89`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::net::SocketAddr;
    use std::time::{SystemTime, UNIX_EPOCH};

    use core_sim::PostTriggerPolicy;
    use runtime::replay::REPLAY_CSV_HEADER;

    use super::{format_currency, run_once, stop_loss_message};
    use crate::config::{Config, RunMode};

    fn sim_config(replay_output_path: String) -> Config {
        Config {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            mode: RunMode::Sim,
            replay_output_path,
            initial_investment: 1_000_000.0,
            stop_loss_pct: 10.0,
            horizon: 60,
            seed: Some(42),
            assets: None,
            post_trigger: PostTriggerPolicy::KeepCompounding,
        }
    }

    #[test]
    fn formats_currency_with_grouping_and_cents() {
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(900_000.0), "$900,000.00");
        assert_eq!(format_currency(12.5), "$12.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1_500.0), "-$1,500.00");
    }

    #[test]
    fn run_once_creates_parent_dir_and_writes_replay() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("lab-server-replay-{unique}"));
        let replay_path = root.join("nested").join("replay.csv");

        let summary = run_once(&sim_config(replay_path.to_str().unwrap().to_owned()))
            .expect("sim mode should run and write replay output");

        let actual = fs::read_to_string(&replay_path).expect("replay output file should exist");
        assert!(actual.starts_with(REPLAY_CSV_HEADER));
        assert_eq!(actual.lines().count(), 62);
        assert_eq!(summary.initial_investment, 1_000_000.0);
        assert!(stop_loss_message(&summary).starts_with("Stop-Loss"));

        fs::remove_dir_all(&root).expect("temp replay directory should be removable");
    }

    #[test]
    fn run_once_rejects_unknown_assets_before_writing() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let replay_path = std::env::temp_dir().join(format!("lab-server-unknown-{unique}.csv"));
        let mut config = sim_config(replay_path.to_str().unwrap().to_owned());
        config.assets = Some(vec!["Gold".to_string()]);

        let err = run_once(&config).unwrap_err();

        assert!(err.to_string().contains("\"Gold\""));
        assert!(!replay_path.exists());
    }
}
