//! Host-side engine for the u-blox UBX binary protocol.
//!
//! ubxprims talks to a GNSS receiver over a serial line or any other byte
//! link: it frames and validates messages, decodes and encodes payloads from a
//! table of known layouts, recovers frames from a noisy stream interleaved with
//! NMEA text, and turns the receiver's asynchronous output into synchronous
//! poll and configuration calls.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte link traits, `Read + Write` adapter, serial port (behind `serial`)
//! - [`frame`]: Frame layout, checksum, stream scanner and NMEA extraction
//! - [`message`]: Message catalog, payload layouts, codec and typed views
//! - [`session`]: Reassembler, request/response controller, baud negotiation (behind `session` feature)

/// Re-export transport types.
pub mod transport {
    pub use ubxprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use ubxprims_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use ubxprims_message::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use ubxprims_session::*;
}
