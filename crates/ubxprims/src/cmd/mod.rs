use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use ubxprims_message::{FormatRegistry, MessageId, RegistryConfig, StartType};
use ubxprims_session::{Controller, RetryPolicy, SessionConfig};
use ubxprims_transport::SerialTransport;

use crate::exit::{message_error, transport_error, CliError, CliResult};
use crate::output::OutputFormat;

pub mod about;
pub mod baud;
pub mod catalog;
pub mod gnss;
pub mod parse;
pub mod poll;
pub mod rate;
pub mod reset;
pub mod stream;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll any message and print the reply.
    Poll(PollArgs),
    /// Print the receiver's software and hardware versions (MON-VER).
    Version,
    /// Find the receiver's line speed and switch both sides to RATE.
    Baud(BaudArgs),
    /// Print messages as the receiver sends them.
    Stream(StreamArgs),
    /// Decode a capture file offline.
    Parse(ParseArgs),
    /// Restart the receiver (CFG-RST). The receiver does not acknowledge this.
    Reset(ResetArgs),
    /// Show or set how often a message is output (CFG-MSG).
    Rate(RateArgs),
    /// Show or change the enabled GNSS systems (CFG-GNSS).
    Gnss(GnssArgs),
    /// List the message layouts this build understands.
    Catalog(CatalogArgs),
    /// Show tool version and build details.
    About(AboutArgs),
}

pub fn run(command: Command, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Poll(args) => poll::run(args, link, format),
        Command::Version => version::run(link, format),
        Command::Baud(args) => baud::run(args, link, format),
        Command::Stream(args) => stream::run(args, link, format),
        Command::Parse(args) => parse::run(args, format),
        Command::Reset(args) => reset::run(args, link),
        Command::Rate(args) => rate::run(args, link, format),
        Command::Gnss(args) => gnss::run(args, link, format),
        Command::Catalog(args) => catalog::run(args, format),
        Command::About(args) => about::run(args, format),
    }
}

/// Receiver connection options shared by every device command.
#[derive(Args, Debug, Clone)]
pub struct LinkArgs {
    /// Serial device the receiver is attached to.
    #[arg(long, short = 'd', env = "UBXPRIMS_DEVICE", global = true)]
    pub device: Option<String>,
    /// Host line speed to open the device at.
    #[arg(long, short = 'b', env = "UBXPRIMS_BAUD", default_value_t = 9600, global = true)]
    pub baud: u32,
    /// Wait per attempt (e.g. 500ms, 2s).
    #[arg(long, default_value = "500ms", value_parser = parse_duration, global = true)]
    pub timeout: Duration,
    /// Retries after the first attempt.
    #[arg(long, default_value_t = ubxprims_session::DEFAULT_MAX_RETRIES, global = true)]
    pub retries: u32,
}

impl LinkArgs {
    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, self.timeout)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            retry: self.retry(),
            ..SessionConfig::default()
        }
    }

    fn device(&self) -> CliResult<&str> {
        self.device
            .as_deref()
            .ok_or_else(|| CliError::usage("no device given (use --device or UBXPRIMS_DEVICE)"))
    }

    /// Open the device for inline request/response use.
    pub fn open(&self) -> CliResult<Controller<SerialTransport>> {
        let transport = self.open_transport()?;
        Ok(Controller::with_config(
            transport,
            registry()?,
            self.session_config(),
        ))
    }

    pub fn open_transport(&self) -> CliResult<SerialTransport> {
        SerialTransport::open(self.device()?, self.baud)
            .map_err(|err| transport_error("open failed", err))
    }
}

pub fn registry() -> CliResult<Arc<FormatRegistry>> {
    FormatRegistry::with_config(RegistryConfig::default())
        .map(Arc::new)
        .map_err(|err| message_error("format table", err))
}

pub fn message_id(name: &str) -> CliResult<MessageId> {
    name.parse::<MessageId>()
        .map_err(|err| message_error("message", err))
}

#[derive(Args, Debug)]
pub struct PollArgs {
    /// Message name, e.g. NAV-PVT or cfg-prt.
    pub message: String,
    /// Poll payload as hex bytes (e.g. "01" for port 1 of CFG-PRT).
    #[arg(long, value_parser = parse_hex)]
    pub payload: Option<HexBytes>,
}

#[derive(Args, Debug)]
pub struct BaudArgs {
    /// Target line speed.
    pub rate: u32,
    /// Speeds to probe, slowest first (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub candidates: Option<Vec<u32>>,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Only print these messages (comma-separated names).
    #[arg(long, value_delimiter = ',')]
    pub messages: Option<Vec<String>>,
    /// Also print NMEA sentences.
    #[arg(long)]
    pub nmea: bool,
    /// Exit after N printed messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Exit after this long (e.g. 30s).
    #[arg(long, value_parser = parse_duration)]
    pub duration: Option<Duration>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Capture file of raw receiver output.
    pub path: PathBuf,
    /// Print every decoded message, not just the summary.
    #[arg(long)]
    pub messages: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StartArg {
    Hot,
    Warm,
    Cold,
}

impl From<StartArg> for StartType {
    fn from(start: StartArg) -> Self {
        match start {
            StartArg::Hot => StartType::Hot,
            StartArg::Warm => StartType::Warm,
            StartArg::Cold => StartType::Cold,
        }
    }
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Which stored navigation data to keep.
    #[arg(long, value_enum, default_value_t = StartArg::Cold)]
    pub start: StartArg,
    /// Sections to clear instead of a start preset (eph, alm, ..., all, none).
    #[arg(long, value_delimiter = ',', conflicts_with = "start")]
    pub clear: Option<Vec<String>>,
    /// Reset mode (hw, sw, swGnssOnly, hwAfterShutdown, gnssStop, gnssStart).
    #[arg(long, default_value = "hw")]
    pub mode: String,
}

#[derive(Args, Debug)]
pub struct RateArgs {
    /// Message whose output rate to show or set.
    pub message: String,
    /// New rate on every port (1 = every navigation solution, 0 = off).
    pub rate: Option<u8>,
}

#[derive(Args, Debug)]
pub struct GnssArgs {
    /// Enable exactly these systems (comma-separated, e.g. GPS,Galileo).
    #[arg(long, value_delimiter = ',')]
    pub enable: Option<Vec<String>>,
    /// Skip the cold restart that applies a new system selection.
    #[arg(long, requires = "enable")]
    pub no_restart: bool,
}

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Only list this class (e.g. NAV).
    #[arg(long)]
    pub class: Option<String>,
}

#[derive(Args, Debug)]
pub struct AboutArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration must not be empty".to_string());
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration value: {input}"))?;
    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

/// Bytes given on the command line as hex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

pub fn parse_hex(input: &str) -> Result<HexBytes, String> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte {:?}", &digits[i..i + 2]))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(HexBytes)
}
