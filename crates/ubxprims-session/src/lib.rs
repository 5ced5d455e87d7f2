//! Receiver sessions over a u-blox byte link.
//!
//! This is the layer applications talk to. Link bytes go through the
//! [`Reassembler`]; decoded messages either resolve the single outstanding
//! request of a [`Controller`] or are handed to the installed [`Handlers`].
//! [`negotiate`] builds line-speed discovery on top of the controller.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ubxprims_message::{FormatRegistry, MessageId, VersionInfo};
//! use ubxprims_session::Controller;
//! use ubxprims_transport::IoTransport;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let port = std::fs::OpenOptions::new()
//!     .read(true)
//!     .write(true)
//!     .open("/dev/ttyACM0")?;
//! let registry = Arc::new(FormatRegistry::builtin()?);
//! let mut controller = Controller::new(IoTransport::new(port), registry);
//! let version = VersionInfo::from_message(&controller.poll(MessageId::MonVer)?)?;
//! println!("{}", version.software);
//! # Ok(())
//! # }
//! ```

pub mod baud;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod exchange;
mod reader;
pub mod reassembler;

pub use baud::{negotiate, BaudConfig, BaudOutcome, DEFAULT_CANDIDATES};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    RetryPolicy, SessionConfig, DEFAULT_IDLE_INTERVAL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
};
pub use controller::{Controller, Delivery};
pub use error::{Result, SessionError};
pub use exchange::{Awaited, Outcome, PendingExchange};
pub use reassembler::{EventSink, Handlers, Reassembler, ReassemblerStats};
