use ubxprims_session::{negotiate, BaudConfig, BaudOutcome};

use crate::cmd::{BaudArgs, LinkArgs};
use crate::exit::{session_error, CliError, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

pub fn run(args: BaudArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = BaudConfig::new(args.rate);
    if let Some(candidates) = args.candidates {
        if candidates.is_empty() {
            return Err(CliError::usage("--candidates must list at least one speed"));
        }
        config = config.with_candidates(candidates);
    }
    config.probe.timeout = link.timeout;
    config.configure.timeout = link.timeout;

    let mut controller = link.open()?;
    let outcome = negotiate(&mut controller, &config)
        .map_err(|err| session_error("baud negotiation failed", err))?;

    print_outcome(&outcome, format);
    Ok(SUCCESS)
}

fn print_outcome(outcome: &BaudOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(outcome),
        OutputFormat::Table | OutputFormat::Pretty => {
            if outcome.changed {
                println!(
                    "Receiver found at {} baud and switched to {} baud.",
                    outcome.found_at, outcome.rate
                );
            } else {
                println!("Receiver is already at {} baud.", outcome.rate);
            }
        }
    }
}
