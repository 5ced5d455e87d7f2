//! Byte-level link abstraction for GNSS receivers.
//!
//! The protocol engine only needs three things from a physical link:
//! - a byte source that may return zero bytes,
//! - a byte sink,
//! - a line-speed setter (used only by baud negotiation).
//!
//! This is the lowest layer of ubxprims. Everything else builds on the
//! traits defined here; opening and configuring real devices stays behind
//! the `serial` feature.

pub mod error;
pub mod traits;

#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Result, TransportError};
pub use traits::{ByteSink, ByteSource, IoTransport, SpeedControl, Transport};

#[cfg(feature = "serial")]
pub use serial::SerialTransport;
