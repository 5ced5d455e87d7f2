mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, LinkArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "ubxprims", version, about = "Poll and configure u-blox GNSS receivers")]
struct Cli {
    #[command(flatten)]
    link: LinkArgs,

    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.link, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_poll_with_link_options() {
        let cli = Cli::try_parse_from([
            "ubxprims",
            "--device",
            "/dev/ttyUSB0",
            "--baud",
            "115200",
            "poll",
            "CFG-PRT",
            "--payload",
            "01",
            "--timeout",
            "2s",
        ])
        .expect("poll args should parse");

        assert_eq!(cli.link.device.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.link.baud, 115_200);
        assert_eq!(cli.link.timeout, Duration::from_secs(2));
        match cli.command {
            Command::Poll(args) => {
                assert_eq!(args.message, "CFG-PRT");
                assert_eq!(args.payload.map(|hex| hex.0), Some(vec![0x01]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn link_defaults() {
        let cli = Cli::try_parse_from(["ubxprims", "catalog"]).expect("catalog should parse");
        assert_eq!(cli.link.baud, 9600);
        assert_eq!(cli.link.retries, 19);
        assert_eq!(cli.link.timeout, Duration::from_millis(500));
    }

    #[test]
    fn reset_rejects_start_with_clear() {
        let err = Cli::try_parse_from([
            "ubxprims", "reset", "--start", "warm", "--clear", "eph,alm",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn no_restart_needs_enable() {
        let err = Cli::try_parse_from(["ubxprims", "gnss", "--no-restart"])
            .expect_err("--no-restart alone should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_baud_candidates() {
        let cli = Cli::try_parse_from([
            "ubxprims",
            "baud",
            "115200",
            "--candidates",
            "9600,38400",
        ])
        .expect("baud args should parse");
        match cli.command {
            Command::Baud(args) => {
                assert_eq!(args.rate, 115_200);
                assert_eq!(args.candidates, Some(vec![9600, 38_400]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = Cli::try_parse_from(["ubxprims", "--timeout", "0s", "version"])
            .expect_err("zero timeout should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
