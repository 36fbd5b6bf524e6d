use std::env;
use std::fs::File;
use std::io::BufWriter;

use crate::combat::{InputPolicy, InvasionSnapshot, RawSnapshot};
use crate::config::{load_config_from_env, EstimatorConfig};
use crate::data::{find_scenario, load_scenarios, validate_scenario_file, ValidationSeverity};
use crate::error::EstimateError;
use crate::estimator::{export_trials_csv, preview_invasion, strength_report, InvasionEstimator};
use crate::server;

const USAGE: &str = "usage: beachhead <simulate|strength|serve|validate|export>";
const SNAPSHOT_USAGE: &str = "usage: beachhead simulate <attacker_troops> <attacker_tech> <defender_troops> <defender_tech> <morale> <bunkers> [trials] [seed] [--table] [--clamp]\n       beachhead simulate --scenario <file> <name> [--table]";
const DEFAULT_SEED: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Strength,
    Validate,
    Export,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("strength") => Some(Command::Strength),
        Some("validate") => Some(Command::Validate),
        Some("export") => Some(Command::Export),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match load_config_from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    match command {
        Command::Serve => handle_serve(&config),
        Command::Simulate => handle_simulate(args, &config),
        Command::Strength => handle_strength(args, &config),
        Command::Validate => handle_validate(args, &config),
        Command::Export => handle_export(args, &config),
    }
}

fn handle_serve(config: &EstimatorConfig) -> i32 {
    let bind_addr =
        env::var(server::BIND_ADDR_ENV).unwrap_or_else(|_| server::DEFAULT_BIND_ADDR.to_string());
    match server::run_server(&bind_addr, config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Positional arguments with flags removed.
fn positional(args: &[String]) -> Vec<&String> {
    args.iter().skip(2).filter(|arg| !arg.starts_with("--")).collect()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn input_policy(args: &[String], config: &EstimatorConfig) -> InputPolicy {
    if has_flag(args, "--clamp") {
        InputPolicy::Clamp
    } else {
        config.input_policy
    }
}

fn parse_snapshot(values: &[&String]) -> Result<RawSnapshot, String> {
    if values.len() < 6 {
        return Err(format!("expected 6 snapshot values, got {}", values.len()));
    }
    let mut parsed = [0_i64; 6];
    for (slot, raw) in parsed.iter_mut().zip(values) {
        *slot = raw
            .parse::<i64>()
            .map_err(|_| format!("'{raw}' is not an integer"))?;
    }
    Ok(RawSnapshot {
        attacker_troops: parsed[0],
        attacker_weapons_tech: parsed[1],
        defender_troops: parsed[2],
        defender_weapons_tech: parsed[3],
        defender_morale: parsed[4],
        defender_bunkers: parsed[5],
    })
}

/// Snapshot, trials and seed from either `--scenario <file> <name>` or six positional numbers.
fn resolve_run(
    args: &[String],
    config: &EstimatorConfig,
) -> Result<(RawSnapshot, u32, u64), String> {
    let values = positional(args);
    if has_flag(args, "--scenario") {
        let (Some(path), Some(name)) = (values.first(), values.get(1)) else {
            return Err("--scenario needs <file> <name>".to_string());
        };
        let file = load_scenarios(path).map_err(|err| err.to_string())?;
        let scenario = find_scenario(&file, name).map_err(|err| err.to_string())?;
        return Ok((
            scenario.snapshot,
            config.trials_or_default(scenario.trials),
            scenario.seed.unwrap_or(DEFAULT_SEED),
        ));
    }
    let snapshot = parse_snapshot(&values)?;
    let trials = parse_u32_arg(values.get(6).copied(), "trials")?;
    let seed = parse_u64_arg(values.get(7).copied(), "seed")?.unwrap_or(DEFAULT_SEED);
    Ok((snapshot, config.trials_or_default(trials), seed))
}

fn handle_simulate(args: &[String], config: &EstimatorConfig) -> i32 {
    let (snapshot, trials, seed) = match resolve_run(args, config) {
        Ok(run) => run,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{SNAPSHOT_USAGE}");
            return 2;
        }
    };

    let preview = match preview_invasion(&snapshot, input_policy(args, config), config.tuning, trials, seed) {
        Ok(preview) => preview,
        Err(err) => {
            eprintln!("unable to compute outcome: {err}");
            return 1;
        }
    };

    if has_flag(args, "--table") {
        println!("trials\tseed\tattacker_strength\tdefender_strength\twin_pct\tavg_attacker_casualties\tavg_defender_casualties");
        println!(
            "{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
            preview.estimate.trials,
            preview.seed,
            preview.strengths.attacker,
            preview.strengths.defender,
            preview.estimate.win_percentage,
            preview.estimate.avg_attacker_casualties,
            preview.estimate.avg_defender_casualties
        );
        return 0;
    }

    match serde_json::to_string_pretty(&preview) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize estimate: {err}");
            1
        }
    }
}

fn handle_strength(args: &[String], config: &EstimatorConfig) -> i32 {
    let raw = match parse_snapshot(&positional(args)) {
        Ok(raw) => raw,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: beachhead strength <attacker_troops> <attacker_tech> <defender_troops> <defender_tech> <morale> <bunkers> [--clamp]");
            return 2;
        }
    };
    let estimator = InvasionSnapshot::from_raw(&raw, input_policy(args, config))
        .map_err(EstimateError::from)
        .and_then(|snapshot| InvasionEstimator::new(snapshot, config.tuning));
    let estimator = match estimator {
        Ok(estimator) => estimator,
        Err(err) => {
            eprintln!("unable to compute strength: {err}");
            return 1;
        }
    };
    match serde_json::to_string_pretty(&strength_report(&estimator)) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize strengths: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String], config: &EstimatorConfig) -> i32 {
    let values = positional(args);
    let Some(path) = values.first() else {
        eprintln!("usage: beachhead validate <scenario-file> [--clamp]");
        return 2;
    };

    match validate_scenario_file(path, input_policy(args, config), config.max_trials) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!(
                    "validation failed: {} error(s)",
                    report.count(ValidationSeverity::Error)
                );
                1
            } else {
                println!("validation passed: {path}");
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_export(args: &[String], config: &EstimatorConfig) -> i32 {
    let values = positional(args);
    let (Some(path), Some(name), Some(out)) = (values.first(), values.get(1), values.get(2)) else {
        eprintln!("usage: beachhead export <scenario-file> <name> <out.csv>");
        return 2;
    };

    match run_export(path, name, out, args, config) {
        Ok(trials) => {
            println!("export complete: trials={trials}, output='{out}'");
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn run_export(
    path: &str,
    name: &str,
    out: &str,
    args: &[String],
    config: &EstimatorConfig,
) -> Result<u32, EstimateError> {
    let file = load_scenarios(path)?;
    let scenario = find_scenario(&file, name)?;
    let snapshot = InvasionSnapshot::from_raw(&scenario.snapshot, input_policy(args, config))?;
    let estimator = InvasionEstimator::new(snapshot, config.tuning)?;
    let trials = config.trials_or_default(scenario.trials);
    let writer = File::create(out).map(BufWriter::new).map_err(csv::Error::from)?;
    let estimate = export_trials_csv(
        &estimator,
        trials,
        scenario.seed.unwrap_or(DEFAULT_SEED),
        writer,
    )?;
    Ok(estimate.trials)
}

fn parse_u32_arg(raw: Option<&String>, name: &str) -> Result<Option<u32>, String> {
    raw.map(|value| {
        value
            .parse::<u32>()
            .map_err(|_| format!("invalid {name} '{value}': expected a non-negative integer"))
    })
    .transpose()
}

fn parse_u64_arg(raw: Option<&String>, name: &str) -> Result<Option<u64>, String> {
    raw.map(|value| {
        value
            .parse::<u64>()
            .map_err(|_| format!("invalid {name} '{value}': expected a non-negative integer"))
    })
    .transpose()
}
