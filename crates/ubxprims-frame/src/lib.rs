//! Binary frame layer for u-blox receivers.
//!
//! Every message on the wire is framed with:
//! - A 2-byte sync marker (0xB5 0x62)
//! - A class byte and a sub-type byte
//! - A 2-byte little-endian payload length
//! - The payload, then a 2-byte running checksum
//!
//! The scanner recovers frame boundaries from an arbitrarily chunked stream
//! that may also carry NMEA text; the text is handed out separately.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod class;
pub mod codec;
pub mod error;
pub mod nmea;
pub mod scanner;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::UbxCodec;
pub use class::class_name;
pub use codec::{
    checksum, decode_frame, encode_frame, validate, Frame, FrameConfig, Identity, Validation,
    FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD, SYNC,
};
pub use error::{FrameError, Result};
pub use nmea::{NmeaExtractor, Sentence, TextItem};
pub use scanner::{CorruptReason, FrameScanner, ScanEvent, ScanState, ScannedFrame};
pub use writer::FrameWriter;
