use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Sync marker: 0xB5 0x62 ("µb").
pub const SYNC: [u8; 2] = [0xB5, 0x62];

/// Header size: sync (2) + class (1) + id (1) + length (2).
pub const HEADER_SIZE: usize = 6;

/// Trailing checksum size.
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes a frame adds around its payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Largest payload the 16-bit length field can describe.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// Default read size for a single transport read.
pub const DEFAULT_READ_CHUNK: usize = 512;

/// Message identity: the (class id, sub-type id) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    /// Class id (offset 2).
    pub class: u8,
    /// Sub-type id (offset 3).
    pub id: u8,
}

impl Identity {
    pub const fn new(class: u8, id: u8) -> Self {
        Self { class, id }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}/0x{:02x}", self.class, self.id)
    }
}

impl From<(u8, u8)> for Identity {
    fn from((class, id): (u8, u8)) -> Self {
        Self { class, id }
    }
}

/// A validated binary frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Class and sub-type of the message.
    pub identity: Identity,
    /// The message payload (may be empty).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(identity: Identity, payload: impl Into<Bytes>) -> Self {
        Self {
            identity,
            payload: payload.into(),
        }
    }

    /// A zero-length frame, the usual form of a poll request.
    pub fn poll(identity: Identity) -> Self {
        Self::new(identity, Bytes::new())
    }

    /// The total wire size of this frame (header + payload + checksum).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode into a freshly allocated wire buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_frame(self.identity, &self.payload, &mut buf)?;
        Ok(buf.freeze())
    }
}

/// Running two-accumulator checksum over `bytes`.
///
/// `a += byte; b += a`, both modulo 256. The domain is class, id, length and
/// payload; never the sync marker.
pub fn checksum(bytes: &[u8]) -> [u8; 2] {
    let mut a = 0u8;
    let mut b = 0u8;
    for &byte in bytes {
        a = a.wrapping_add(byte);
        b = b.wrapping_add(a);
    }
    [a, b]
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬───────┬──────┬──────────┬──────────────┬──────────┐
/// │ Sync (2B)  │ Class │ Id   │ Length   │ Payload      │ CK_A/B   │
/// │ 0xB5 0x62  │ (1B)  │ (1B) │ (2B LE)  │ (Length B)   │ (2B)     │
/// └────────────┴───────┴──────┴──────────┴──────────────┴──────────┘
/// ```
pub fn encode_frame(identity: Identity, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(FRAME_OVERHEAD + payload.len());
    let start = dst.len();
    dst.put_slice(&SYNC);
    dst.put_u8(identity.class);
    dst.put_u8(identity.id);
    dst.put_u16_le(payload.len() as u16);
    dst.put_slice(payload);
    let ck = checksum(&dst[start + 2..]);
    dst.put_slice(&ck);
    Ok(())
}

/// Outcome of inspecting a byte slice that should start with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Validation {
    /// The slice starts with the sync marker.
    pub sync_found: bool,
    /// Identity from the header, once at least the header is present.
    pub identity: Option<Identity>,
    /// Declared payload length, once at least the header is present.
    pub length: Option<usize>,
    /// At least `length + 8` bytes are available.
    pub length_satisfiable: bool,
    /// Computed checksum equals the trailing two bytes.
    pub checksum_ok: bool,
}

impl Validation {
    /// True when the slice holds a complete frame with a good checksum.
    pub fn is_valid(&self) -> bool {
        self.sync_found && self.length_satisfiable && self.checksum_ok
    }
}

/// Inspect `bytes` for a frame starting at offset 0.
///
/// Never fails; each check only runs once the previous one passed.
pub fn validate(bytes: &[u8]) -> Validation {
    let mut result = Validation::default();

    if bytes.len() < SYNC.len() || bytes[..2] != SYNC {
        return result;
    }
    result.sync_found = true;

    if bytes.len() < HEADER_SIZE {
        return result;
    }

    let length = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
    result.identity = Some(Identity::new(bytes[2], bytes[3]));
    result.length = Some(length);

    if bytes.len() < length + FRAME_OVERHEAD {
        return result;
    }
    result.length_satisfiable = true;

    let end = HEADER_SIZE + length;
    result.checksum_ok = checksum(&bytes[2..end]) == [bytes[end], bytes[end + 1]];
    result
}

/// Strictly decode one frame from the start of `bytes`.
///
/// Returns the frame and the number of bytes it occupied.
pub fn decode_frame(bytes: &[u8]) -> Result<(Frame, usize)> {
    let check = validate(bytes);
    if !check.sync_found {
        return Err(FrameError::InvalidSync);
    }
    let (Some(identity), Some(length)) = (check.identity, check.length) else {
        return Err(FrameError::Truncated {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    };
    let total = length + FRAME_OVERHEAD;
    if !check.length_satisfiable {
        return Err(FrameError::Truncated {
            needed: total,
            available: bytes.len(),
        });
    }
    let end = HEADER_SIZE + length;
    if !check.checksum_ok {
        return Err(FrameError::ChecksumInvalid {
            identity,
            computed: checksum(&bytes[2..end]),
            found: [bytes[end], bytes[end + 1]],
        });
    }

    let payload = Bytes::copy_from_slice(&bytes[HEADER_SIZE..end]);
    Ok((Frame { identity, payload }, total))
}

/// Configuration for frame scanning and reading.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest declared payload accepted as a frame candidate.
    ///
    /// A candidate above the limit is skipped like a checksum failure.
    /// Default: 65535 (any length the header can express).
    pub max_payload_size: usize,
    /// Bytes requested from the transport per read. Default: 512.
    pub read_chunk_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD,
            read_chunk_size: DEFAULT_READ_CHUNK,
        }
    }
}
