/// Command-line entry point.
///
/// ```text
/// crag_conditions [--crag <id>] [--replay <forecast.json>]
/// ```
///
/// Fetches (or replays) each crag's hourly weather, runs the conditions
/// simulation and prints a report per crag. A crag whose data cannot be
/// fetched or adapted is reported as "no data"; the others still run.

use chrono::Utc;
use std::error::Error;
use std::time::Duration;

use crag_conditions::config::ServiceConfig;
use crag_conditions::crags::{self, Crag};
use crag_conditions::dev_mode::DevMode;
use crag_conditions::ingest::open_meteo::{self, Forecast};
use crag_conditions::logging::{self, DataSource};
use crag_conditions::model::{ConditionsError, PredictionRecord};
use crag_conditions::report;

const USAGE: &str = "usage: crag_conditions [--crag <id>] [--replay <file>]";

#[derive(Debug, PartialEq)]
struct Args {
    crag: Option<String>,
    replay: Option<String>,
}

/// Parses the arguments after the program name.
fn parse_args<I: IntoIterator<Item = String>>(raw: I) -> Result<Args, ConditionsError> {
    let mut args = Args { crag: None, replay: None };
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--crag" => &mut args.crag,
            "--replay" => &mut args.replay,
            other => {
                return Err(ConditionsError::Config(format!("unknown argument '{}' ({})", other, USAGE)));
            }
        };
        match iter.next() {
            Some(value) if !value.starts_with("--") => *slot = Some(value),
            _ => {
                return Err(ConditionsError::Config(format!("{} needs a value ({})", arg, USAGE)));
            }
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args(std::env::args().skip(1))?;
    let config = ServiceConfig::from_env()?;
    logging::init_logger(config.log_level, config.log_file.as_deref(), false);

    let mut crag_list = match &config.registry_path {
        Some(path) => crags::load_crags(path)?,
        None => crags::builtin_crags(),
    };
    if let Some(id) = &args.crag {
        crag_list.retain(|c| &c.id == id);
        if crag_list.is_empty() {
            return Err(ConditionsError::Config(format!("no crag with id '{}'", id)).into());
        }
    }
    logging::info(
        DataSource::Registry,
        None,
        &format!("{} crags loaded", crag_list.len()),
    );

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;
    let replay = args.replay.as_deref().map(DevMode::new);

    let mut successful = 0;
    for crag in &crag_list {
        let forecast = match &replay {
            Some(dev) => dev.load_payload(&crag.id),
            None => open_meteo::fetch_forecast(&client, crag, config.window),
        };

        match forecast.and_then(|f| simulate_crag(crag, f)) {
            Ok((predictions, now)) => {
                successful += 1;
                report::print_crag_report(crag, &predictions, now);
            }
            Err(e) => {
                logging::log_weather_failure(&crag.id, "conditions run", &e);
                println!("{}", report::render_no_data(crag));
            }
        }
    }

    logging::log_run_summary(crag_list.len(), successful, crag_list.len() - successful);
    Ok(())
}

fn simulate_crag(
    crag: &Crag,
    forecast: Forecast,
) -> Result<(Vec<PredictionRecord>, chrono::NaiveDateTime), ConditionsError> {
    let predictions = crag_conditions::run_crag(crag, &forecast.hourly)?;
    Ok((predictions, forecast.local_time_at(Utc::now())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, ConditionsError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_arguments_runs_everything_live() {
        assert_eq!(args(&[]), Ok(Args { crag: None, replay: None }));
    }

    #[test]
    fn test_crag_and_replay_values() {
        assert_eq!(
            args(&["--crag", "farley", "--replay", "saved.json"]),
            Ok(Args {
                crag: Some("farley".to_string()),
                replay: Some("saved.json".to_string()),
            })
        );
    }

    #[test]
    fn test_flag_without_value_is_rejected() {
        for list in [&["--crag"][..], &["--replay"][..], &["--crag", "--replay", "saved.json"][..]] {
            match args(list) {
                Err(ConditionsError::Config(msg)) => {
                    assert!(msg.contains("needs a value"), "{}", msg);
                    assert!(msg.contains(USAGE), "{}", msg);
                }
                other => panic!("{:?} should be rejected, got {:?}", list, other),
            }
        }
    }

    #[test]
    fn test_unknown_argument_is_rejected() {
        assert!(matches!(args(&["--verbose"]), Err(ConditionsError::Config(_))));
    }
}
