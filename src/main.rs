//! Command-line entry point: `riskpulse <input.json>`.
//!
//! Logs go to stderr. Stdout carries only the report, framed by sentinel
//! lines so a caller can cut the JSON out of a mixed stream.

use std::path::PathBuf;
use std::process::ExitCode;

use riskpulse::{CompanyInput, PredictionReport, RiskEngine, RiskError, Settings};

const RESULT_START: &str = "PREDICTION_RESULT_START";
const RESULT_END: &str = "PREDICTION_RESULT_END";

#[cfg(feature = "tracing-subscriber")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(not(feature = "tracing-subscriber"))]
fn init_logging() {}

fn emit(report: &PredictionReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{RESULT_START}\n{json}\n{RESULT_END}"),
        Err(e) => eprintln!("FATAL ERROR: could not serialize report: {e}"),
    }
}

async fn run(path: PathBuf) -> Result<PredictionReport, (RiskError, Option<CompanyInput>)> {
    let input = CompanyInput::from_path(&path).map_err(|e| (e, None))?;
    tracing::info!(symbol = %input.symbol, sector = %input.sector, "starting prediction pipeline");

    let engine = RiskEngine::from_settings(&Settings::from_env())
        .map_err(|e| (e, Some(input.clone())))?;
    let outcome = engine.run(&input).await.map_err(|e| (e, Some(input.clone())))?;
    if outcome.is_degraded() {
        tracing::warn!("report produced by the heuristic fallback");
    }
    Ok(outcome.into_report())
}

fn main() -> ExitCode {
    init_logging();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("ERROR: No input file provided");
        eprintln!("usage: riskpulse <input.json>");
        emit(&PredictionReport::neutral("UNKNOWN", "Unknown"));
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL ERROR: could not start runtime: {e}");
            emit(&PredictionReport::neutral("UNKNOWN", "Unknown"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(path)) {
        Ok(report) => {
            emit(&report);
            ExitCode::SUCCESS
        }
        Err((e, input)) => {
            eprintln!("FATAL ERROR: {e}");
            let report = input.map_or_else(
                || PredictionReport::neutral("UNKNOWN", "Unknown"),
                |i| PredictionReport::neutral(i.symbol, i.sector),
            );
            emit(&report);
            ExitCode::FAILURE
        }
    }
}
