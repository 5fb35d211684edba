use std::process::ExitCode;

use glam::Vec3;
use tracing_subscriber::EnvFilter;

use shuttle_sim::{RallyRunner, SimConfig};

/// Receiving-court target used when none is given.
const DEFAULT_TARGET: (f32, f32) = (0.0, 4.0);

fn parse_arg(args: &[String], index: usize, name: &str) -> Result<Option<f32>, String> {
    match args.get(index) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f32>()
            .map(Some)
            .map_err(|e| format!("invalid {name} {raw:?}: {e}")),
    }
}

fn parse_args(args: &[String]) -> Result<(f32, f32, Option<f32>), String> {
    let x = parse_arg(args, 0, "target_x")?.unwrap_or(DEFAULT_TARGET.0);
    let z = parse_arg(args, 1, "target_z")?.unwrap_or(DEFAULT_TARGET.1);
    let power = parse_arg(args, 2, "power01")?;
    Ok((x, z, power))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (x, z, power) = match parse_args(&args) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: shuttle-sim [target_x target_z [power01]]");
            return ExitCode::FAILURE;
        },
    };

    let config = SimConfig::load();
    let runner = match RallyRunner::new(config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start simulator");
            return ExitCode::FAILURE;
        },
    };

    let target = Vec3::new(x, runner.config().simulation.ground_height, z);
    tracing::info!(?target, ?power, "Playing shot");

    let report = match runner.play_shot(runner.hitter(), target, power, None) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Shot failed");
            return ExitCode::FAILURE;
        },
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode report");
            ExitCode::FAILURE
        },
    }
}
